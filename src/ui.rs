use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{LoadState, PortalApp};
use crate::constants::{messages, ui as dims};
use crate::router::LocationPort;
use crate::storage::PersistencePort;
use crate::theme::{ChainColor, Palette};
use crate::view::{self, Badge, MetadataPanel, NetworkView, Row, RowKind, Tab};

/// Terminal-only input state that the headless app does not track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Chrome {
    pub search_focused: bool,
}

// ===============================
// Top-level draw
// ===============================
pub fn draw<L: LocationPort, P: PersistencePort>(f: &mut Frame, app: &PortalApp<L, P>, chrome: Chrome) {
    let palette = Palette::default();
    let area = f.area();

    if area.width < dims::MIN_WIDTH || area.height < dims::MIN_HEIGHT {
        too_small(f, area, &palette);
        return;
    }

    let mut constraints: Vec<Constraint> = Vec::with_capacity(4);
    constraints.push(Constraint::Length(2)); // header
    if app.banner_visible() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0)); // body
    constraints.push(Constraint::Length(1)); // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut idx = 0usize;
    header(f, chunks[idx], app, &palette);
    idx += 1;
    if app.banner_visible() {
        banner(f, chunks[idx], &palette);
        idx += 1;
    }
    body(f, chunks[idx], app, chrome, &palette);
    idx += 1;
    footer(f, chunks[idx], app, chrome, &palette);

    if let Some(msg) = app.toast() {
        toast(f, msg, &palette);
    }
}

fn too_small(f: &mut Frame, area: Rect, palette: &Palette) {
    let warning_text = format!(
        "Terminal too small!\n\nMinimum size: {}×{}\nCurrent size: {}×{}\n\nPlease resize your terminal.",
        dims::MIN_WIDTH,
        dims::MIN_HEIGHT,
        area.width,
        area.height
    );
    let warning = Paragraph::new(warning_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.error).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(palette.error)),
        );
    f.render_widget(warning, area);
}

// ===============================
// Header / banner / footer
// ===============================
fn header<L: LocationPort, P: PersistencePort>(f: &mut Frame, area: Rect, app: &PortalApp<L, P>, palette: &Palette) {
    let accent = accent_of(app.view().as_ref(), palette);

    let mut spans = vec![Span::styled(
        " Metadata Portal ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(view) = app.view() {
        spans.push(Span::styled(
            format!(" {} ", view.title),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::raw("  "));

    for (i, tab) in Tab::ALL.iter().enumerate() {
        spans.push(Span::raw(if i == 0 { "┌─" } else { "┬─" }));
        if *tab == app.tab() {
            spans.push(Span::styled(
                tab.title(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(tab.title(), Style::default().fg(palette.text_dim)));
        }
        spans.push(Span::raw("─"));
    }
    spans.push(Span::raw("┐"));

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(palette.border)),
    );
    f.render_widget(paragraph, area);
}

fn banner(f: &mut Frame, area: Rect, palette: &Palette) {
    let line = Line::from(vec![
        Span::styled(" ℹ ", Style::default().fg(palette.warn)),
        Span::raw(messages::BANNER),
        Span::styled("  (b to hide)", Style::default().fg(palette.text_dim)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn footer<L: LocationPort, P: PersistencePort>(
    f: &mut Frame,
    area: Rect,
    app: &PortalApp<L, P>,
    chrome: Chrome,
    palette: &Palette,
) {
    let hints = if chrome.search_focused {
        "Type to search · Enter select · Esc done"
    } else {
        "↑↓ networks · Enter select · Tab switch · ←→ QR · / search · c/r/l/h copy · b hide banner · q quit"
    };
    let line = Line::from(vec![
        Span::styled(hints, Style::default().fg(palette.text_dim)),
        Span::raw("  "),
        Span::styled(app.fragment(), Style::default().fg(palette.border)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

// ===============================
// Body
// ===============================
fn body<L: LocationPort, P: PersistencePort>(
    f: &mut Frame,
    area: Rect,
    app: &PortalApp<L, P>,
    chrome: Chrome,
    palette: &Palette,
) {
    match app.load_state() {
        LoadState::Loading => {
            let p = Paragraph::new("Loading networks…")
                .alignment(Alignment::Center)
                .style(Style::default().fg(palette.text_dim));
            f.render_widget(p, area);
            return;
        }
        LoadState::Unavailable(_) => {
            // Data problems are for developers (see the log); the page stays empty.
            return;
        }
        LoadState::Ready => {}
    }

    let narrow = area.width < dims::NARROW_THRESHOLD;
    if narrow {
        if app.sidebar_open() || chrome.search_focused {
            sidebar(f, area, app, chrome, palette);
        } else {
            card(f, area, app, palette);
        }
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(dims::SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(area);
    sidebar(f, cols[0], app, chrome, palette);
    card(f, cols[1], app, palette);
}

fn sidebar<L: LocationPort, P: PersistencePort>(
    f: &mut Frame,
    area: Rect,
    app: &PortalApp<L, P>,
    chrome: Chrome,
    palette: &Palette,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    // Search box
    let focused = chrome.search_focused;
    let query = app.search();
    let text = if query.is_empty() && !focused { "/ to search" } else { query };
    let search = Paragraph::new(text)
        .style(Style::default().fg(if focused { palette.text } else { palette.text_dim }))
        .block(
            Block::default()
                .title(" Search ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(if focused { palette.warn } else { palette.border })),
        );
    f.render_widget(search, rows[0]);
    if focused && rows[0].width > 2 {
        let x = rows[0].x + 1 + (query.chars().count().min(rows[0].width.saturating_sub(2) as usize) as u16);
        f.set_cursor_position((x, rows[0].y + 1));
    }

    // Network list
    let active = app.active();
    let items: Vec<ListItem> = app
        .visible_networks()
        .into_iter()
        .filter_map(|id| app.chains().get(id))
        .map(|spec| {
            let color = ChainColor::parse(&spec.color)
                .accent()
                .map(Color::from)
                .unwrap_or(palette.text_dim);
            let mut title_style = Style::default().fg(palette.text);
            if active == Some(spec.identifier.as_str()) {
                title_style = title_style.add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(color)),
                Span::styled(view::capitalize_first(&spec.title), title_style),
            ]))
        })
        .collect();

    let empty = items.is_empty();
    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" Networks ({}) ", app.chains().len()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.border)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    if !empty {
        state.select(Some(app.cursor()));
    }
    f.render_stateful_widget(list, rows[1], &mut state);
}

fn card<L: LocationPort, P: PersistencePort>(f: &mut Frame, area: Rect, app: &PortalApp<L, P>, palette: &Palette) {
    let Some(view) = app.view() else {
        return;
    };
    let accent = accent_of(Some(&view), palette);

    let mut title = vec![Span::styled(
        format!(" {} ", view.title),
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    )];
    if let Some(relay) = &view.relay_chain {
        title.push(Span::styled(
            format!("· {} parachain ", view::capitalize_first(relay)),
            Style::default().fg(palette.text_dim),
        ));
    }

    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent));

    let lines = match app.tab() {
        Tab::Chain => chain_lines(&view, palette),
        Tab::Metadata => metadata_lines(&view, palette, accent),
    };

    let p = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

fn chain_lines(view: &NetworkView, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = view.spec_rows.iter().map(|r| row_line(r, palette)).collect();
    lines.push(Line::raw(""));
    lines.push(qr_line("Chain spec QR", &view.specs_qr_path, palette));
    lines.push(badge_line(&view.specs_badge, palette));
    lines
}

fn metadata_lines(view: &NetworkView, palette: &Palette, accent: Color) -> Vec<Line<'static>> {
    let panel: &MetadataPanel = &view.metadata;
    let mut lines = Vec::new();

    if let Some(prompt) = &view.next_prompt {
        lines.push(Line::styled(
            prompt.clone(),
            Style::default().fg(palette.ok).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::raw(""));
    }

    if panel.out_of_date {
        lines.push(Line::styled(
            format!("Metadata #{} is out of date: not available yet", panel.version),
            Style::default().fg(palette.warn).add_modifier(Modifier::BOLD),
        ));
    }

    if panel.options.len() > 1 {
        let mut spans = Vec::new();
        for (i, opt) in panel.options.iter().enumerate() {
            let style = if Some(i) == panel.selected {
                Style::default().fg(accent).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(palette.text_dim)
            };
            spans.push(Span::styled(format!(" {} ", opt.label), style));
        }
        lines.push(Line::from(spans));
        lines.push(Line::raw(""));
    }

    if let Some(opt) = panel.selected_option() {
        if panel.options.len() == 1 {
            lines.push(Line::styled(opt.label.clone(), Style::default().add_modifier(Modifier::BOLD)));
        }
        lines.push(qr_line("Metadata QR", &opt.path, palette));
        lines.push(badge_line(&opt.badge, palette));
        if !opt.source_rows.is_empty() {
            lines.push(Line::raw(""));
            lines.extend(opt.source_rows.iter().map(|r| row_line(r, palette)));
        }
    }

    if let Some(path) = &view.latest_metadata_path {
        lines.push(Line::raw(""));
        lines.push(qr_line("Latest metadata", path, palette));
    }
    lines
}

// ===============================
// Helpers
// ===============================
fn row_line(row: &Row, palette: &Palette) -> Line<'static> {
    let label = Span::styled(format!("{:<16}", row.label), Style::default().fg(palette.text_dim));
    let value = match row.kind {
        RowKind::Color => {
            let swatch = ChainColor::parse(&row.value)
                .accent()
                .map(Color::from)
                .unwrap_or(palette.text_dim);
            return Line::from(vec![
                label,
                Span::styled("■ ", Style::default().fg(swatch)),
                Span::raw(row.value.clone()),
            ]);
        }
        RowKind::Hash if !row.full_width => Span::raw(view::short_hash(&row.value)),
        RowKind::Link => Span::styled(
            row.value.clone(),
            Style::default().add_modifier(Modifier::UNDERLINED),
        ),
        _ => Span::raw(row.value.clone()),
    };
    Line::from(vec![label, value])
}

fn qr_line(label: &str, path: &str, palette: &Palette) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<16}"), Style::default().fg(palette.text_dim)),
        Span::raw(path.to_string()),
    ])
}

fn badge_line(badge: &Badge, palette: &Palette) -> Line<'static> {
    let (mark, color) = match badge {
        Badge::Signed(_) => ("✓", palette.ok),
        Badge::Unsigned => ("!", palette.warn),
    };
    Line::styled(format!("{mark} {}", badge.label()), Style::default().fg(color))
}

fn accent_of(view: Option<&NetworkView>, palette: &Palette) -> Color {
    view.and_then(|v| ChainColor::parse(&v.color).accent())
        .map(Color::from)
        .unwrap_or(palette.text)
}

/// Failures get a cross, a no-op gets a warning, anything else a check.
fn toast_mark(message: &str, palette: &Palette) -> (&'static str, Color) {
    match message {
        messages::COPY_FAILED => ("✗", palette.error),
        messages::NOTHING_TO_COPY => ("!", palette.warn),
        _ => ("✓", palette.ok),
    }
}

fn toast(f: &mut Frame, message: &str, palette: &Palette) {
    let area = f.area();
    let width = (area.width * 4) / 10;
    let height = 3;
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let overlay = Rect { x, y, width, height };

    f.render_widget(Clear, overlay);
    let (mark, color) = toast_mark(message, palette);
    let text = Paragraph::new(format!("{mark} {message}"))
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(text, overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::MemoryLocation;
    use crate::storage::MemoryStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &PortalApp<MemoryLocation, MemoryStore>, w: u16, h: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        terminal.draw(|f| draw(f, app, Chrome::default())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn loaded(fragment: &str) -> PortalApp<MemoryLocation, MemoryStore> {
        let mut app = PortalApp::new(MemoryLocation::new(fragment), MemoryStore::new());
        app.on_data(Ok(crate::test_support::chains(&["polkadot", "kusama"])));
        app
    }

    #[test]
    fn renders_active_network_card() {
        let screen = render(&loaded("#/kusama"), 120, 30);
        assert!(screen.contains("Kusama"));
        assert!(screen.contains("wss://kusama"));
        assert!(screen.contains("qr/kusama_specs.png"));
    }

    #[test]
    fn failed_copy_toast_is_not_checked() {
        let mut app = loaded("#/kusama");
        app.show_toast(messages::COPY_FAILED.to_string());
        let screen = render(&app, 120, 30);
        assert!(screen.contains("✗ Copy failed"));
        assert!(!screen.contains("✓ Copy failed"));

        app.show_toast(messages::COPY_RPC.to_string());
        assert!(render(&app, 120, 30).contains("✓ Copied RPC endpoint"));
    }

    #[test]
    fn toast_marks_follow_severity() {
        let palette = Palette::default();
        assert_eq!(toast_mark(messages::COPY_FAILED, &palette), ("✗", palette.error));
        assert_eq!(toast_mark(messages::NOTHING_TO_COPY, &palette), ("!", palette.warn));
        assert_eq!(toast_mark(messages::COPY_GENERIC, &palette), ("✓", palette.ok));
    }

    #[test]
    fn metadata_tab_without_qr_shows_out_of_date() {
        let screen = render(&loaded("#/polkadot?tab=metadata"), 120, 30);
        assert!(screen.contains("not available yet"));
    }

    #[test]
    fn tiny_terminal_shows_warning() {
        let screen = render(&loaded(""), 40, 10);
        assert!(screen.contains("too small"));
    }
}
