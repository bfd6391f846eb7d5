//! Sender identification by text prefix.

use std::collections::BTreeMap;

use crate::models::config::ParserConfig;

/// Maps a fixed-length text prefix to an invoice type code.
#[derive(Debug, Clone)]
pub struct SenderTable {
    prefix_len: usize,
    entries: BTreeMap<String, String>,
}

impl SenderTable {
    pub fn new(prefix_len: usize) -> Self {
        Self {
            prefix_len,
            entries: BTreeMap::new(),
        }
    }

    /// Add a sender prefix and the type code its invoices get.
    pub fn with_sender(mut self, prefix: impl Into<String>, code: impl Into<String>) -> Self {
        self.entries.insert(prefix.into(), code.into());
        self
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            prefix_len: config.prefix_len,
            entries: config.senders.clone(),
        }
    }

    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Type code for the document, `None` for an unknown sender.
    ///
    /// Leading whitespace left by text extraction is skipped before the
    /// prefix is taken.
    pub fn classify(&self, text: &str) -> Option<&str> {
        let prefix: String = text.trim_start().chars().take(self.prefix_len).collect();
        self.entries.get(&prefix).map(String::as_str)
    }
}

impl Default for SenderTable {
    fn default() -> Self {
        Self::from_config(&ParserConfig::default())
    }
}
