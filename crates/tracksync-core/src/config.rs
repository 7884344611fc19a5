//! Tracked-entry configuration
//!
//! A JSON file listing which document feeds which card:
//!
//! ```json
//! {
//!   "entries": [
//!     { "name": "Ada", "branch": "ada/log", "log_file_path": "logs/ada.md", "trello_card_id": "5f1c..." }
//!   ],
//!   "markers": { "milestones": "## 🏁 Milestones", "daily_logs": "## 📆 Daily Logs" }
//! }
//! ```
//!
//! `interns` is accepted in place of `entries`. Entries with a missing or
//! blank field are set aside as [`InvalidEntry`] and the rest still run.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracksync_document::SectionMarkers;

/// One document → card pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntry {
    /// Human-readable label used in logs and reports
    pub name: String,
    /// Branch holding the document
    pub branch: String,
    /// Path of the document inside the repository
    pub file_path: String,
    /// Target card
    pub card_id: String,
}

impl TrackedEntry {
    /// Create new entry
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        branch: impl Into<String>,
        file_path: impl Into<String>,
        card_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            branch: branch.into(),
            file_path: file_path.into(),
            card_id: card_id.into(),
        }
    }
}

/// Config entry that could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEntry {
    /// Position in the config list
    pub index: usize,
    /// Name, when the entry had one
    pub name: Option<String>,
    /// Why it was rejected
    pub reason: String,
}

/// Loaded configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncConfig {
    /// Entries to sync, in file order
    pub entries: Vec<TrackedEntry>,
    /// Entries skipped because a required field was missing
    pub invalid: Vec<InvalidEntry>,
    /// Section headings used when parsing documents
    pub markers: SectionMarkers,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default, alias = "interns")]
    entries: Vec<serde_json::Value>,
    #[serde(default)]
    markers: Option<SectionMarkers>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    branch: Option<String>,
    #[serde(default, alias = "file_path")]
    log_file_path: Option<String>,
    #[serde(default, alias = "card_id")]
    trello_card_id: Option<String>,
}

impl RawEntry {
    fn validate(self, index: usize) -> Result<TrackedEntry, InvalidEntry> {
        fn present(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        }

        let name = present(self.name);
        let branch = present(self.branch);
        let file_path = present(self.log_file_path);
        let card_id = present(self.trello_card_id);

        match (name, branch, file_path, card_id) {
            (Some(name), Some(branch), Some(file_path), Some(card_id)) => Ok(TrackedEntry {
                name,
                branch,
                file_path,
                card_id,
            }),
            (name, branch, file_path, card_id) => {
                let missing: Vec<&str> = [
                    ("name", name.is_none()),
                    ("branch", branch.is_none()),
                    ("log_file_path", file_path.is_none()),
                    ("trello_card_id", card_id.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                Err(InvalidEntry {
                    index,
                    name,
                    reason: format!("missing {}", missing.join(", ")),
                })
            }
        }
    }
}

impl SyncConfig {
    /// Read and validate the config file at `path`
    ///
    /// Invalid entries are logged and kept in [`SyncConfig::invalid`].
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - `ConfigError::Malformed` if it is not a JSON object of the expected shape
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config = Self::from_json(&text).map_err(|e| ConfigError::malformed(path, e))?;
        tracing::info!(
            path = %path.display(),
            entries = config.entries.len(),
            invalid = config.invalid.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Parse and validate config JSON
    ///
    /// # Errors
    /// Returns the decode error if the top level does not match.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: RawConfig = serde_json::from_str(text)?;

        let mut config = Self {
            markers: raw.markers.unwrap_or_default(),
            ..Self::default()
        };

        for (index, value) in raw.entries.into_iter().enumerate() {
            let checked = match serde_json::from_value::<RawEntry>(value.clone()) {
                Ok(entry) => entry.validate(index),
                Err(e) => Err(InvalidEntry {
                    index,
                    name: value.get("name").and_then(|n| n.as_str()).map(str::to_string),
                    reason: e.to_string(),
                }),
            };
            match checked {
                Ok(entry) => config.entries.push(entry),
                Err(invalid) => {
                    tracing::warn!(
                        index = invalid.index,
                        name = invalid.name.as_deref().unwrap_or("<unnamed>"),
                        reason = %invalid.reason,
                        "skipping invalid config entry"
                    );
                    config.invalid.push(invalid);
                }
            }
        }

        Ok(config)
    }
}
