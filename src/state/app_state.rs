//! Application state definitions

use super::forms::FieldId;
use std::collections::VecDeque;

/// Which part of the screen receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FieldId),
    SignaturePad,
    ActionPanel,
}

impl Default for Focus {
    fn default() -> Self {
        Self::Field(FieldId::FullName)
    }
}

impl Focus {
    /// Tab order: text fields, signature pad, action panel
    const ORDER: [Focus; 8] = [
        Focus::Field(FieldId::FullName),
        Focus::Field(FieldId::EmailAddress),
        Focus::Field(FieldId::PhoneNumber),
        Focus::Field(FieldId::InvoiceNumber),
        Focus::Field(FieldId::Amount),
        Focus::Field(FieldId::InvoiceDate),
        Focus::SignaturePad,
        Focus::ActionPanel,
    ];

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    /// The form control this focus edits, if any
    pub fn field(&self) -> Option<FieldId> {
        match self {
            Self::Field(id) => Some(*id),
            Self::SignaturePad => Some(FieldId::Signature),
            Self::ActionPanel => None,
        }
    }
}

/// Buttons of the action panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormAction {
    #[default]
    Submit,
    Reset,
    ClearSignature,
}

impl FormAction {
    pub const ALL: [FormAction; 3] = [
        FormAction::Submit,
        FormAction::Reset,
        FormAction::ClearSignature,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Submit => "Submit",
            Self::Reset => "Reset",
            Self::ClearSignature => "Clear signature",
        }
    }

    pub fn shortcut(&self) -> &'static str {
        match self {
            Self::Submit => crate::platform::SUBMIT_SHORTCUT,
            Self::Reset => crate::platform::RESET_SHORTCUT,
            Self::ClearSignature => "Del",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Submit => Self::Reset,
            Self::Reset => Self::ClearSignature,
            Self::ClearSignature => Self::Submit,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Submit => Self::ClearSignature,
            Self::Reset => Self::Submit,
            Self::ClearSignature => Self::Reset,
        }
    }
}

/// A queued error dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub message: String,
    /// Offer to retry the submission from the dialog
    pub retry: bool,
}

/// "Download Invoice" confirmation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadPrompt {
    /// `true` when "Download" is highlighted, `false` for "Cancel"
    pub confirm_selected: bool,
}

impl Default for DownloadPrompt {
    fn default() -> Self {
        Self {
            confirm_selected: true,
        }
    }
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    pub focus: Focus,
    pub selected_action: FormAction,
    pub status_message: Option<String>,
    pub download_prompt: Option<DownloadPrompt>,
    /// Id of the last accepted invoice
    pub last_invoice_id: Option<String>,
    errors: VecDeque<ErrorEntry>,
}

impl AppState {
    /// Queue an error for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("Error queued: {message}");
        self.errors.push_back(ErrorEntry {
            message,
            retry: false,
        });
    }

    /// Queue a submission failure that can be retried
    pub fn push_submission_error(&mut self, message: impl Into<String>) {
        self.errors.push_back(ErrorEntry {
            message: message.into(),
            retry: true,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn current_error(&self) -> Option<&ErrorEntry> {
        self.errors.front()
    }

    pub fn dismiss_error(&mut self) -> Option<ErrorEntry> {
        self.errors.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_focus_cycles_through_all_controls() {
        let mut focus = Focus::default();
        let mut seen = vec![focus];
        for _ in 0..7 {
            focus = focus.next();
            seen.push(focus);
        }
        assert_eq!(seen.len(), 8);
        assert_eq!(seen[6], Focus::SignaturePad);
        assert_eq!(seen[7], Focus::ActionPanel);
        assert_eq!(focus.next(), Focus::default());
    }

    #[test]
    fn test_focus_prev_wraps() {
        assert_eq!(Focus::default().prev(), Focus::ActionPanel);
        assert_eq!(Focus::SignaturePad.prev(), Focus::Field(FieldId::InvoiceDate));
    }

    #[test]
    fn test_focus_field() {
        assert_eq!(Focus::SignaturePad.field(), Some(FieldId::Signature));
        assert_eq!(Focus::ActionPanel.field(), None);
    }

    #[test]
    fn test_action_cycle() {
        let mut action = FormAction::default();
        for expected in [FormAction::Reset, FormAction::ClearSignature, FormAction::Submit] {
            action = action.next();
            assert_eq!(action, expected);
        }
        assert_eq!(FormAction::Submit.prev(), FormAction::ClearSignature);
    }

    #[test]
    fn test_error_queue_is_fifo() {
        let mut state = AppState::default();
        assert!(!state.has_errors());
        state.push_error("first");
        state.push_submission_error("second");
        assert_eq!(state.current_error().map(|e| e.message.as_str()), Some("first"));
        assert!(!state.dismiss_error().unwrap().retry);
        assert!(state.current_error().unwrap().retry);
        state.dismiss_error();
        assert!(!state.has_errors());
    }
}
