// Native binary for the Metadata Portal - Terminal UI mode

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use metadata_portal::{
    app::{Effect, PortalApp},
    config::load,
    constants::{app as app_consts, messages},
    data,
    error::Result as PortalResult,
    platform,
    router::MemoryLocation,
    storage::{MemoryStore, PersistencePort, SqliteStore},
    types::Chains,
    ui::{self, Chrome},
    ui_snapshot::{CopyField, UiAction},
};

type App = PortalApp<MemoryLocation, Box<dyn PersistencePort>>;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cfg = load().context("Failed to load configuration")?;
    if log::log_enabled!(log::Level::Info) {
        cfg.print_summary();
    }

    // Choice store: best-effort, falls back to memory
    let store: Box<dyn PersistencePort> = match SqliteStore::open(&cfg.state_db) {
        Ok(s) => Box::new(s),
        Err(e) => {
            log::warn!("[store] {e}; choices will not persist");
            Box::new(MemoryStore::new())
        }
    };

    let mut app: App = PortalApp::new(
        MemoryLocation::with_base(&cfg.base_url, &cfg.initial_fragment),
        store,
    );

    // one-shot data load
    let (tx, rx) = unbounded_channel::<PortalResult<Chains>>();
    let source = cfg.data.clone();
    let load_task = tokio::spawn(async move {
        let _ = tx.send(data::load(&source).await);
    });

    // terminal; stderr logging would corrupt the alternate screen
    let level = log::max_level();
    log::set_max_level(log::LevelFilter::Off);
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_loop(&mut app, &mut terminal, rx, cfg.render_fps).await;

    // cleanup
    load_task.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    log::set_max_level(level);

    if let Some(id) = app.active() {
        eprintln!("{id} ({})", app.fragment());
    }
    result
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<PortalResult<Chains>>,
    fps: u32,
) -> Result<()> {
    let mut last_frame = Instant::now();
    let mut chrome = Chrome::default();
    let mut toast_at: Option<Instant> = None;
    let mut dirty = true;

    loop {
        // frame budget (coalesced renders)
        let frame_ms = 1000u32.saturating_div(fps.max(1)) as u64;
        let budget = Duration::from_millis(frame_ms.max(1));
        let wait = budget.saturating_sub(last_frame.elapsed());

        if event::poll(wait)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    if !handle_key(app, &mut chrome, k) {
                        break;
                    }
                    if app.toast().is_some() {
                        toast_at = Some(Instant::now());
                    }
                    dirty = true;
                }
            } else {
                dirty = true; // resize
            }
        }

        while let Ok(result) = rx.try_recv() {
            app.on_data(result);
            dirty = true;
        }

        if toast_at.is_some_and(|t| t.elapsed() >= Duration::from_secs(app_consts::TOAST_DURATION_SECS)) {
            app.clear_toast();
            toast_at = None;
            dirty = true;
        }

        if dirty && last_frame.elapsed() >= budget {
            terminal.draw(|f| ui::draw(f, app, chrome))?;
            last_frame = Instant::now();
            dirty = false;
        }
    }
    Ok(())
}

/// Returns `false` when the user asked to quit.
fn handle_key(app: &mut App, chrome: &mut Chrome, k: KeyEvent) -> bool {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (k.code, k.modifiers) {
        return false;
    }

    // Search input mode
    if chrome.search_focused {
        match k.code {
            KeyCode::Char(c) => {
                let mut text = app.search().to_string();
                text.push(c);
                app.apply(UiAction::SetSearch { text });
            }
            KeyCode::Backspace => {
                let mut text = app.search().to_string();
                text.pop();
                app.apply(UiAction::SetSearch { text });
            }
            KeyCode::Up => app.cursor_up(),
            KeyCode::Down => app.cursor_down(),
            KeyCode::Enter => {
                app.activate_cursor();
                chrome.search_focused = false;
            }
            KeyCode::Esc => chrome.search_focused = false,
            _ => {}
        }
        return true;
    }

    match k.code {
        KeyCode::Char('q') => return false,
        KeyCode::Esc => {
            if !app.search().is_empty() {
                app.apply(UiAction::SetSearch { text: String::new() });
            } else if app.sidebar_open() {
                app.apply(UiAction::ToggleSidebar);
            }
        }
        KeyCode::Char('/') => chrome.search_focused = true,
        KeyCode::Char('s') => {
            app.apply(UiAction::ToggleSidebar);
        }
        KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_down(),
        KeyCode::Enter => app.activate_cursor(),
        KeyCode::Tab | KeyCode::BackTab => {
            let tab = app.tab().toggle();
            app.apply(UiAction::SetTab { tab });
        }
        KeyCode::Left => {
            let index = app.qr_index().saturating_sub(1);
            app.apply(UiAction::SelectQr { index });
        }
        KeyCode::Right => {
            let index = app.qr_index() + 1;
            app.apply(UiAction::SelectQr { index });
        }
        KeyCode::Char('b') => {
            app.apply(UiAction::HideBanner);
        }
        KeyCode::Char('c') => copy(app, CopyField::GenesisHash, messages::COPY_GENESIS),
        KeyCode::Char('r') => copy(app, CopyField::RpcEndpoint, messages::COPY_RPC),
        KeyCode::Char('l') => copy(app, CopyField::Link, messages::COPY_LINK),
        KeyCode::Char('h') => copy(app, CopyField::SourceHash, messages::COPY_HASH),
        _ => {}
    }
    true
}

fn copy(app: &mut App, field: CopyField, ok_msg: &str) {
    let msg = match app.apply(UiAction::Copy { field }) {
        Effect::Copy(text) if platform::copy_to_clipboard(&text) => ok_msg,
        Effect::Copy(_) => messages::COPY_FAILED,
        Effect::None => messages::NOTHING_TO_COPY,
    };
    app.show_toast(msg.to_string());
}
