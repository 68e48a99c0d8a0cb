//! Download confirmation dialog

use super::base::{key_span, render_dialog, DialogChoices, DialogConfig};
use crate::state::DownloadPrompt;
use ratatui::{style::Color, text::Span, Frame};

const CHOICES: [&str; 2] = ["Download", "Cancel"];

/// Render the "Download Invoice" confirmation
pub fn render_confirm_dialog(frame: &mut Frame, prompt: &DownloadPrompt) {
    let hint = vec![
        key_span("←→"),
        Span::styled(" select  ", Color::DarkGray),
        key_span("Enter"),
        Span::styled(" confirm  ", Color::DarkGray),
        key_span("Esc"),
        Span::styled(" cancel", Color::DarkGray),
    ];

    render_dialog(
        frame,
        DialogConfig {
            title: "Download Invoice",
            title_color: Color::Cyan,
            border_color: Color::Cyan,
            message: "Do you want to download the invoice?",
            choices: Some(DialogChoices {
                labels: &CHOICES,
                selected: if prompt.confirm_selected { 0 } else { 1 },
            }),
            hint: Some(hint),
            max_width: 50,
        },
    );
}
