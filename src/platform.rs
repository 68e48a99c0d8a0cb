//! Platform-specific configuration

use crossterm::event::KeyModifiers;

/// Platform-appropriate modifier for the copy shortcut
/// - macOS: SUPER (Cmd key)
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const COPY_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const COPY_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Submit works with Ctrl on every platform
pub const SUBMIT_SHORTCUT: &str = "Ctrl+S";

pub const RESET_SHORTCUT: &str = "Ctrl+R";

pub const LOAD_SIGNATURE_SHORTCUT: &str = "Ctrl+L";

/// Copy invoice id shortcut display
/// - macOS: "Cmd+Y"
/// - Linux/Windows: "Ctrl+Y"
#[cfg(target_os = "macos")]
pub const COPY_ID_SHORTCUT: &str = "Cmd+Y";

#[cfg(not(target_os = "macos"))]
pub const COPY_ID_SHORTCUT: &str = "Ctrl+Y";
