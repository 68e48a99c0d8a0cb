//! UI module for rendering the TUI

mod components;
mod forms;
pub mod layout;
mod signature_pad;

use crate::app::App;
use components::{render_confirm_dialog, render_error_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let layout = layout::compute_layout(frame.area(), app.surface.options().display_rows);

    forms::draw_invoice_form(frame, &layout, app);
    layout::draw_status_bar(frame, layout.status, app);

    // Modal overlays, errors first
    if let Some(error) = app.state.current_error() {
        render_error_dialog(frame, error);
    } else if let Some(prompt) = &app.state.download_prompt {
        render_confirm_dialog(frame, prompt);
    }
}
