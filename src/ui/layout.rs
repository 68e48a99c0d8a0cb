//! Layout management for the TUI

use crate::app::App;
use crate::platform::{COPY_ID_SHORTCUT, LOAD_SIGNATURE_SHORTCUT};
use crate::state::{FieldId, FormAction};
use crate::ui::components::BUTTON_HEIGHT;
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Input box height (border + content + border)
pub const FIELD_HEIGHT: u16 = 3;
/// Input box plus its error line
const FIELD_SLOT: u16 = FIELD_HEIGHT + 1;
const ACTION_WIDTH: u16 = 24;

/// Screen position of one text input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
    pub id: FieldId,
    pub input: Rect,
    pub error: Rect,
}

/// Every region of the invoice screen.
///
/// Shared between rendering and mouse hit-testing so both agree on where
/// things are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLayout {
    pub title: Rect,
    /// Group headers: personal details, invoice details
    pub headers: [Rect; 2],
    pub fields: Vec<FieldSlot>,
    /// Bordered signature pad block
    pub signature: Rect,
    pub signature_error: Rect,
    pub actions: Vec<(FormAction, Rect)>,
    pub status: Rect,
}

impl FormLayout {
    /// Text field under a screen position
    pub fn field_at(&self, column: u16, row: u16) -> Option<FieldId> {
        let pos = Position::new(column, row);
        self.fields
            .iter()
            .find(|slot| slot.input.contains(pos))
            .map(|slot| slot.id)
    }

    pub fn action_at(&self, column: u16, row: u16) -> Option<FormAction> {
        let pos = Position::new(column, row);
        self.actions
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(action, _)| *action)
    }

    /// Inside of the signature block, where the surface is drawn
    pub fn signature_inner(&self) -> Rect {
        Rect {
            x: self.signature.x.saturating_add(1),
            y: self.signature.y.saturating_add(1),
            width: self.signature.width.saturating_sub(2),
            height: self.signature.height.saturating_sub(2),
        }
    }
}

/// Compute the screen layout for a terminal area
pub fn compute_layout(area: Rect, pad_rows: u16) -> FormLayout {
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1 + FIELD_SLOT * 3),
        Constraint::Length(pad_rows + 2),
        Constraint::Length(1),
        Constraint::Length(BUTTON_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(area);

    let columns =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[1]);

    let groups = [
        [FieldId::FullName, FieldId::EmailAddress, FieldId::PhoneNumber],
        [FieldId::InvoiceNumber, FieldId::Amount, FieldId::InvoiceDate],
    ];

    let mut headers = [Rect::default(); 2];
    let mut fields = Vec::with_capacity(6);
    for (i, (column, ids)) in columns.iter().zip(groups).enumerate() {
        let parts = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(FIELD_SLOT),
            Constraint::Length(FIELD_SLOT),
            Constraint::Length(FIELD_SLOT),
        ])
        .split(*column);
        headers[i] = parts[0];
        for (slot, id) in parts[1..].iter().zip(ids) {
            let input_height = slot.height.min(FIELD_HEIGHT);
            fields.push(FieldSlot {
                id,
                input: Rect {
                    height: input_height,
                    ..*slot
                },
                error: Rect {
                    y: slot.y + input_height,
                    height: slot.height - input_height,
                    ..*slot
                },
            });
        }
    }

    let buttons = Layout::horizontal([
        Constraint::Length(ACTION_WIDTH),
        Constraint::Length(ACTION_WIDTH),
        Constraint::Length(ACTION_WIDTH),
        Constraint::Min(0),
    ])
    .split(rows[4]);

    FormLayout {
        title: rows[0],
        headers,
        fields,
        signature: rows[2],
        signature_error: rows[3],
        actions: FormAction::ALL
            .iter()
            .zip(buttons.iter())
            .map(|(action, rect)| (*action, *rect))
            .collect(),
        status: rows[6],
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::raw(" ")];

    if app.service.is_submitting() {
        spans.push(Span::styled(
            "Submitting...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    } else if app.service.is_valid() {
        spans.push(Span::styled("● Ready to submit", Style::default().fg(Color::Green)));
    } else {
        spans.push(Span::styled("○ Incomplete", Style::default().fg(Color::Gray)));
    }

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let hints = format!(" {LOAD_SIGNATURE_SHORTCUT}:load sig  {COPY_ID_SHORTCUT}:copy id  ^C:quit ");
    let hint_width = (hints.chars().count() as u16).min(area.width);
    let hint_area = Rect {
        x: area.x + area.width.saturating_sub(hint_width),
        y: area.y,
        width: hint_width,
        height: area.height,
    };
    let hint_widget =
        Paragraph::new(hints).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(hint_widget, hint_area);
}
