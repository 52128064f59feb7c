//! Native clipboard via copypasta.

use copypasta::{ClipboardContext, ClipboardProvider};

pub fn copy_to_clipboard(content: &str) -> bool {
    let mut ctx = match ClipboardContext::new() {
        Ok(ctx) => ctx,
        Err(e) => {
            log::warn!("[clipboard] unavailable: {e}");
            return false;
        }
    };
    match ctx.set_contents(content.to_string()) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("[clipboard] copy failed: {e}");
            false
        }
    }
}
