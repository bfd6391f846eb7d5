//! Configuration structures for the invoice desk.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{InvdeskError, Result};
use crate::models::invoice::Status;

/// Main configuration for invdesk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvdeskConfig {
    /// Status folder names.
    pub folders: FolderConfig,

    /// Invoice field extraction configuration.
    pub parser: ParserConfig,

    /// List display configuration.
    pub list: ListConfig,

    /// Keystroke automation configuration.
    pub automation: AutomationConfig,

    /// Preview rendering configuration.
    pub preview: PreviewConfig,
}

/// Names of the status subfolders inside the working folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Invoices without a booking number.
    pub missing_wo: String,

    /// Invoices that need manual attention.
    pub error: String,

    /// Invoices already uploaded.
    pub uploaded: String,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            missing_wo: "wo".to_string(),
            error: "err".to_string(),
            uploaded: "uploaded".to_string(),
        }
    }
}

impl FolderConfig {
    /// Subfolder an invoice with this status is relocated to.
    pub fn folder_for(&self, status: Status) -> Option<&str> {
        match status {
            Status::MissingWo => Some(self.missing_wo.as_str()),
            Status::Error => Some(self.error.as_str()),
            Status::Uploaded => Some(self.uploaded.as_str()),
            _ => None,
        }
    }

    /// All status subfolders.
    pub fn all(&self) -> [&str; 3] {
        [
            self.missing_wo.as_str(),
            self.error.as_str(),
            self.uploaded.as_str(),
        ]
    }
}

/// Invoice field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Number of leading characters used to identify the sender.
    pub prefix_len: usize,

    /// Sender prefix to invoice type code.
    pub senders: BTreeMap<String, String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        let mut senders = BTreeMap::new();
        senders.insert("Expeditors".to_string(), "EXP".to_string());
        Self {
            prefix_len: 10,
            senders,
        }
    }
}

/// List display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Number of leading columns the search query is matched against.
    pub search_columns: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self { search_columns: 3 }
    }
}

/// Keystroke backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationBackend {
    /// Log the key sequence instead of sending it.
    #[default]
    Log,
    /// Send real key events to the focused window.
    Keyboard,
}

/// Keystroke automation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Where key sequences go.
    pub backend: AutomationBackend,

    /// Pause after each key action, in milliseconds.
    pub action_delay_ms: u64,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            backend: AutomationBackend::Log,
            action_delay_ms: 100,
        }
    }
}

/// Preview rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Page renderer: "embedded", or "pdfium" when built with it.
    pub renderer: String,

    /// Default viewport width in pixels.
    pub width: u32,

    /// Quiet period before re-rendering after a resize, in milliseconds.
    pub resize_delay_ms: u64,

    /// Where the session writes the rendered preview.
    pub output: Option<PathBuf>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            renderer: "embedded".to_string(),
            width: 800,
            resize_delay_ms: 5,
            output: None,
        }
    }
}

impl InvdeskConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| InvdeskError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| InvdeskError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
