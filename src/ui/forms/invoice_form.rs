//! Invoice form screen

use super::field_renderer::{draw_error_line, draw_field};
use crate::app::App;
use crate::state::{FieldId, Focus, FormAction};
use crate::ui::components::render_action_button;
use crate::ui::layout::FormLayout;
use crate::ui::signature_pad::SignaturePad;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const GROUP_TITLES: [&str; 2] = ["Personal Details", "Invoice Details"];

pub fn draw_invoice_form(frame: &mut Frame, layout: &FormLayout, app: &App) {
    let title = Paragraph::new(Line::from(vec![Span::styled(
        " New Invoice",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]));
    frame.render_widget(title, layout.title);

    for (area, text) in layout.headers.iter().zip(GROUP_TITLES) {
        let header = Paragraph::new(Span::styled(
            format!(" {text}"),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(header, *area);
    }

    for slot in &layout.fields {
        if let Some(field) = app.form.field(slot.id) {
            let error = app.form.visible_error(slot.id);
            draw_field(
                frame,
                slot.input,
                slot.error,
                field,
                app.state.focus == Focus::Field(slot.id),
                error.as_deref(),
            );
        }
    }

    draw_signature(frame, layout, app);

    let submitting = app.service.is_submitting();
    for (action, area) in &layout.actions {
        let enabled = match action {
            FormAction::Submit => app.service.can_submit(),
            FormAction::Reset => !submitting,
            FormAction::ClearSignature => !submitting && app.surface.has_ink(),
        };
        let label = if *action == FormAction::Submit && submitting {
            "Submitting..."
        } else {
            action.label()
        };
        render_action_button(
            frame,
            *area,
            label,
            action.shortcut(),
            app.state.focus == Focus::ActionPanel && app.state.selected_action == *action,
            enabled,
        );
    }
}

fn draw_signature(frame: &mut Frame, layout: &FormLayout, app: &App) {
    let is_active = app.state.focus == Focus::SignaturePad;
    let error = app.form.visible_error(FieldId::Signature);
    let border_style = match (is_active, error.is_some()) {
        (true, _) => Style::default().fg(Color::Cyan),
        (false, true) => Style::default().fg(Color::Red),
        (false, false) => Style::default().fg(Color::DarkGray),
    };
    let title = if app.surface.is_disabled() {
        " Signature (locked) "
    } else {
        " Signature "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    frame.render_widget(block, layout.signature);

    let pad_area = app.surface.display_area(layout.signature_inner());
    frame.render_widget(
        SignaturePad::new(&app.surface).placeholder(FieldId::Signature.placeholder()),
        pad_area,
    );
    draw_error_line(frame, layout.signature_error, error.as_deref());
}
