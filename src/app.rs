//! Application state and core logic

use crate::config::AppConfig;
use crate::invoice::{InvoiceBackend, InvoicesService, PendingSubmission};
use crate::platform::COPY_MODIFIER;
use crate::signature::{container_width, ContainerWidth, DrawingSurface, SurfaceEvent};
use crate::state::{AppState, DownloadPrompt, FieldId, Focus, FormAction, FormEvent, InvoiceForm};
use crate::ui::layout::{compute_layout, FormLayout};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::sync::Arc;
use std::time::{Duration, Instant};

const IDLE_POLL: Duration = Duration::from_millis(100);
/// Poll interval while a stroke, load or submission is in flight
const ACTIVE_POLL: Duration = Duration::from_millis(16);

/// Main application struct
pub struct App {
    pub state: AppState,
    pub form: InvoiceForm,
    pub surface: DrawingSurface,
    pub service: InvoicesService,
    pub config: AppConfig,
    /// Reports the signature block width to the surface
    container: ContainerWidth,
    pending: Option<PendingSubmission>,
    /// Terminal size (height, width)
    pub terminal_size: Option<(u16, u16)>,
    quit: bool,
}

impl App {
    pub fn new(config: AppConfig, backend: Arc<dyn InvoiceBackend>) -> Self {
        let options = config.surface_options();
        let (container, observer) = container_width(options.display_width.saturating_add(2));
        let surface = DrawingSurface::new(options, Box::new(observer));

        Self {
            state: AppState::default(),
            form: InvoiceForm::new(),
            surface,
            service: InvoicesService::new(backend),
            config,
            container,
            pending: None,
            terminal_size: None,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message);
    }

    /// Record the terminal size and report the pad container width
    pub fn set_terminal_size(&mut self, height: u16, width: u16) {
        self.terminal_size = Some((height, width));
        if let Some(layout) = self.layout() {
            self.container.set(layout.signature.width);
        }
    }

    fn layout(&self) -> Option<FormLayout> {
        self.terminal_size.map(|(height, width)| {
            compute_layout(
                Rect::new(0, 0, width, height),
                self.surface.options().display_rows,
            )
        })
    }

    /// How long the event loop may block waiting for input
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        if self.surface.is_drawing() || self.surface.has_pending_loads() || self.pending.is_some() {
            return ACTIVE_POLL;
        }
        self.form
            .next_deadline(now)
            .map_or(IDLE_POLL, |due| due.min(IDLE_POLL))
    }

    /// Advance background work: resize, decoded loads, debounced form
    /// publication and submission completion.
    pub async fn tick(&mut self, now: Instant) {
        self.surface.sync_display_width();
        self.surface.apply_pending();
        self.sync_signature(now);
        self.form.poll(now);
        self.forward_form_events();

        if self.pending.as_ref().is_some_and(PendingSubmission::is_finished) {
            if let Some(pending) = self.pending.take() {
                self.complete_submission(pending).await;
            }
        }
    }

    fn sync_signature(&mut self, now: Instant) {
        for event in self.surface.take_events() {
            match event {
                SurfaceEvent::DrawingEnded | SurfaceEvent::Cleared | SurfaceEvent::Loaded => {
                    self.form.set_signature(self.surface.serialize(), now);
                }
                SurfaceEvent::DrawingStarted | SurfaceEvent::Changed => {}
            }
        }
    }

    fn forward_form_events(&mut self) {
        for event in self.form.take_events() {
            match event {
                FormEvent::ValueChanged(value) => self.service.update_form_data(value),
                FormEvent::ValidityChanged(valid) => self.service.update_form_validation(valid),
            }
        }
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Error dialog is modal
        if self.state.has_errors() {
            match key.code {
                KeyCode::Enter => {
                    if self.state.dismiss_error().is_some_and(|e| e.retry) {
                        self.submit();
                    }
                }
                KeyCode::Esc => {
                    self.state.dismiss_error();
                }
                _ => {}
            }
            return Ok(());
        }

        if self.state.download_prompt.is_some() {
            self.handle_download_prompt_key(key);
            return Ok(());
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => {
                self.execute_action(FormAction::Submit);
                return Ok(());
            }
            KeyCode::Char('r') if ctrl => {
                self.execute_action(FormAction::Reset);
                return Ok(());
            }
            KeyCode::Char('l') if ctrl => {
                self.load_saved_signature();
                return Ok(());
            }
            KeyCode::Char('y') if key.modifiers.contains(COPY_MODIFIER) => {
                self.copy_invoice_id();
                return Ok(());
            }
            _ => {}
        }

        // Clear any status messages on key press
        self.state.status_message = None;
        let now = Instant::now();

        match key.code {
            KeyCode::Tab => self.set_focus(self.state.focus.next()),
            KeyCode::BackTab => self.set_focus(self.state.focus.prev()),
            _ => match self.state.focus {
                Focus::Field(id) => self.handle_field_key(id, key, now),
                Focus::SignaturePad => match key.code {
                    KeyCode::Delete | KeyCode::Backspace => self.clear_signature(),
                    KeyCode::Enter => self.set_focus(self.state.focus.next()),
                    _ => {}
                },
                Focus::ActionPanel => match key.code {
                    KeyCode::Left | KeyCode::Up => {
                        self.state.selected_action = self.state.selected_action.prev();
                    }
                    KeyCode::Right | KeyCode::Down => {
                        self.state.selected_action = self.state.selected_action.next();
                    }
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        self.execute_action(self.state.selected_action);
                    }
                    _ => {}
                },
            },
        }

        Ok(())
    }

    fn handle_field_key(&mut self, id: FieldId, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.form.input_char(id, c, now);
            }
            KeyCode::Backspace => self.form.backspace(id, now),
            KeyCode::Enter => self.set_focus(self.state.focus.next()),
            _ => {}
        }
    }

    /// Move focus, marking the control being left as touched
    fn set_focus(&mut self, focus: Focus) {
        if focus == self.state.focus {
            return;
        }
        if let Some(id) = self.state.focus.field() {
            self.form.mark_touched(id);
        }
        self.state.focus = focus;
    }

    fn execute_action(&mut self, action: FormAction) {
        self.state.selected_action = action;
        match action {
            FormAction::Submit => self.submit(),
            FormAction::Reset => self.reset_form(),
            FormAction::ClearSignature => self.clear_signature(),
        }
    }

    fn submit(&mut self) {
        if self.service.is_submitting() {
            return;
        }
        // Publish a value still inside its debounce window
        self.service.update_form_data(self.form.value());
        self.service.update_form_validation(self.form.is_valid());

        if !self.service.can_submit() {
            for id in FieldId::TEXT_FIELDS {
                self.form.mark_touched(id);
            }
            self.form.mark_touched(FieldId::Signature);
            self.state.status_message = Some("Please fix the highlighted fields".to_string());
            return;
        }

        match self.service.submit_invoice() {
            Ok(pending) => {
                tracing::info!("Invoice submission started");
                self.pending = Some(pending);
                self.surface.set_disabled(true);
                self.state.status_message = Some("Submitting invoice...".to_string());
            }
            Err(err) => {
                let message = self
                    .service
                    .submission_result()
                    .map(|r| r.message.clone())
                    .unwrap_or_else(|| err.to_string());
                self.state.push_submission_error(message);
            }
        }
    }

    async fn complete_submission(&mut self, pending: PendingSubmission) {
        let outcome = pending.outcome().await;
        let signature = self.service.form_data().signature.clone();
        let result = self.service.finish_submission(outcome);
        self.surface.set_disabled(false);

        if !result.success {
            self.state.status_message = None;
            self.state.push_submission_error(result.message);
            return;
        }

        let id = result.invoice_id.unwrap_or_default();
        self.state.status_message = Some(format!("Invoice generated successfully! ID: {id}"));
        self.state.last_invoice_id = Some(id).filter(|id| !id.is_empty());

        if self.config.remember_signature {
            if let Some(encoded) = signature {
                if let Err(err) = AppConfig::save_signature(&encoded) {
                    tracing::warn!("Failed to remember signature: {err}");
                }
            }
        }

        self.clear_inputs();
        self.service.reset_with_pdf();

        if self.config.only_preview_invoice {
            self.preview_pdf();
        } else {
            self.state.download_prompt = Some(DownloadPrompt::default());
        }
    }

    /// Wipe the form and the pad without publishing a signature change
    fn clear_inputs(&mut self) {
        self.surface.clear();
        self.surface.take_events();
        self.form.reset();
        self.state.focus = Focus::default();
    }

    fn reset_form(&mut self) {
        if self.service.is_submitting() {
            return;
        }
        self.clear_inputs();
        self.service.reset_form();
        self.state.status_message = Some("Form reset".to_string());
    }

    fn clear_signature(&mut self) {
        if self.surface.is_disabled() {
            return;
        }
        self.surface.clear();
    }

    fn load_saved_signature(&mut self) {
        if self.surface.is_disabled() {
            return;
        }
        match AppConfig::load_signature() {
            Ok(Some(encoded)) => {
                self.surface.load(Some(&encoded));
                self.state.status_message = Some("Loaded saved signature".to_string());
            }
            Ok(None) => self.state.status_message = Some("No saved signature".to_string()),
            Err(err) => self.push_error(format!("Failed to load saved signature: {err}")),
        }
    }

    fn preview_pdf(&mut self) {
        match self.service.preview_pdf() {
            Ok(Some(path)) => {
                self.state.status_message =
                    Some(format!("Invoice preview written to {}", path.display()));
            }
            Ok(None) => {}
            Err(err) => self.push_error(format!("Failed to write invoice preview: {err}")),
        }
    }

    fn handle_download_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.state.download_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Tab
            | KeyCode::BackTab => prompt.confirm_selected = !prompt.confirm_selected,
            KeyCode::Enter => {
                let download = prompt.confirm_selected;
                self.close_download_prompt(download);
            }
            KeyCode::Char('y') => self.close_download_prompt(true),
            KeyCode::Char('n') | KeyCode::Esc => self.close_download_prompt(false),
            _ => {}
        }
    }

    fn close_download_prompt(&mut self, download: bool) {
        self.state.download_prompt = None;
        if download {
            let dir = self.config.download_dir();
            match self.service.download_pdf(&dir) {
                Ok(Some(path)) => {
                    self.state.status_message =
                        Some(format!("Invoice saved to {}", path.display()));
                }
                Ok(None) => self.push_error("No invoice available to download"),
                Err(err) => self.push_error(format!("Failed to save invoice: {err}")),
            }
        }
        self.service.clear_submission_result();
    }

    fn copy_invoice_id(&mut self) {
        let Some(id) = self.state.last_invoice_id.clone() else {
            self.state.status_message = Some("No invoice id to copy".to_string());
            return;
        };
        match Self::copy_to_clipboard(&id) {
            Ok(()) => self.state.status_message = Some(format!("Copied {id}")),
            Err(err) => self.push_error(format!("Failed to copy to clipboard: {err}")),
        }
    }

    fn copy_to_clipboard(text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }

    /// Handle a mouse event
    pub async fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if self.state.has_errors() || self.state.download_prompt.is_some() {
            return Ok(());
        }
        let Some(layout) = self.layout() else {
            return Ok(());
        };
        let pad = self.surface.display_area(layout.signature_inner());
        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(point) = self.surface.map_cell(pad, column, row) {
                    self.set_focus(Focus::SignaturePad);
                    self.surface.begin(point);
                } else if let Some(id) = layout.field_at(column, row) {
                    self.set_focus(Focus::Field(id));
                } else if let Some(action) = layout.action_at(column, row) {
                    self.set_focus(Focus::ActionPanel);
                    self.execute_action(action);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if self.surface.is_drawing() => {
                match self.surface.map_cell(pad, column, row) {
                    Some(point) => self.surface.extend(point),
                    // Leaving the pad ends the stroke
                    None => self.surface.end(),
                }
            }
            MouseEventKind::Up(MouseButton::Left) if self.surface.is_drawing() => {
                self.surface.end();
            }
            _ => {}
        }
        Ok(())
    }
}
