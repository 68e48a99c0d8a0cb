//! Configuration handling for the TUI

use crate::signature::SurfaceOptions;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the download directory
pub const DOWNLOAD_DIR_ENV: &str = "INVOICE_TUI_DOWNLOAD_DIR";

const SIGNATURE_FILE: &str = "signature.txt";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "invoice", "invoice-tui")
}

/// User configuration for the TUI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Where downloaded invoices are written
    pub download_dir: Option<PathBuf>,
    /// Open a preview instead of offering a download
    pub only_preview_invoice: bool,
    /// Raster width of the signature in pixels
    pub signature_width: Option<u32>,
    /// Raster height of the signature in pixels
    pub signature_height: Option<u32>,
    pub stroke_width: Option<f32>,
    /// Preferred width of the signature pad in terminal columns
    pub signature_columns: Option<u16>,
    /// Keep the last submitted signature for reuse
    pub remember_signature: bool,
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    fn signature_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().join(SIGNATURE_FILE))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                serde_json::from_str(&content)?
            }
            _ => Self::default(),
        };
        config.apply_env(std::env::var(DOWNLOAD_DIR_ENV).ok());
        Ok(config)
    }

    fn apply_env(&mut self, download_dir: Option<String>) {
        if let Some(dir) = download_dir.filter(|d| !d.trim().is_empty()) {
            self.download_dir = Some(PathBuf::from(dir));
        }
    }

    /// Download directory, falling back to the user's download folder
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(|| directories::UserDirs::new().and_then(|u| u.download_dir().map(Into::into)))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn surface_options(&self) -> SurfaceOptions {
        let defaults = SurfaceOptions::default();
        SurfaceOptions {
            width: self.signature_width.unwrap_or(defaults.width).max(1),
            height: self.signature_height.unwrap_or(defaults.height).max(1),
            stroke_width: self.stroke_width.unwrap_or(defaults.stroke_width),
            display_width: self
                .signature_columns
                .unwrap_or(defaults.display_width)
                .max(1),
            ..defaults
        }
    }

    /// Load the remembered signature data URL, if any
    pub fn load_signature() -> Result<Option<String>> {
        match Self::signature_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                Ok(Some(content.trim().to_string()).filter(|s| !s.is_empty()))
            }
            _ => Ok(None),
        }
    }

    /// Remember a signature data URL for later sessions
    pub fn save_signature(encoded: &str) -> Result<()> {
        if let Some(path) = Self::signature_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, encoded)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.download_dir.is_none());
        assert!(!config.only_preview_invoice);
        assert!(!config.remember_signature);
        assert_eq!(config.surface_options(), SurfaceOptions::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"only_preview_invoice": true, "signature_columns": 40}"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert!(parsed.only_preview_invoice);
        assert_eq!(parsed.signature_columns, Some(40));
        assert!(parsed.download_dir.is_none());
        assert_eq!(parsed.surface_options().display_width, 40);
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        let json = r#"{"stroke_width": 3.5, "unknown_field": "value"}"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.surface_options().stroke_width, 3.5);
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = AppConfig {
            download_dir: Some(PathBuf::from("/tmp/invoices")),
            signature_width: Some(600),
            remember_signature: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_env_overrides_download_dir() {
        let mut config = AppConfig {
            download_dir: Some(PathBuf::from("/from/file")),
            ..Default::default()
        };
        config.apply_env(Some("/from/env".to_string()));
        assert_eq!(config.download_dir(), PathBuf::from("/from/env"));

        config.apply_env(Some("  ".to_string()));
        assert_eq!(config.download_dir(), PathBuf::from("/from/env"));
        config.apply_env(None);
        assert_eq!(config.download_dir(), PathBuf::from("/from/env"));
    }

    #[test]
    fn test_zero_sizes_are_clamped() {
        let config = AppConfig {
            signature_width: Some(0),
            signature_columns: Some(0),
            ..Default::default()
        };
        let options = config.surface_options();
        assert_eq!(options.width, 1);
        assert_eq!(options.display_width, 1);
    }

    #[test]
    fn test_load_returns_ok() {
        assert!(AppConfig::load().is_ok());
    }
}
