//! Error dialog component

use super::base::{key_span, render_dialog, DialogConfig};
use crate::state::ErrorEntry;
use ratatui::{style::Color, text::Span, Frame};

/// Render an error dialog overlay centered on the screen
pub fn render_error_dialog(frame: &mut Frame, error: &ErrorEntry) {
    let hint = if error.retry {
        vec![
            key_span("Enter"),
            Span::raw(" to retry, "),
            key_span("Esc"),
            Span::raw(" to dismiss"),
        ]
    } else {
        vec![
            Span::raw("Press "),
            key_span("Enter"),
            Span::raw(" or "),
            key_span("Esc"),
            Span::raw(" to dismiss"),
        ]
    };

    render_dialog(
        frame,
        DialogConfig {
            title: if error.retry { "Submission failed" } else { "Error" },
            title_color: Color::Red,
            border_color: Color::Red,
            message: &error.message,
            hint: Some(hint),
            ..Default::default()
        },
    );
}
