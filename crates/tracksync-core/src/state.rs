//! Persisted run state
//!
//! A small JSON object keyed by card id recording which checklists the last
//! run resolved and when. Reconciliation never reads it.

use crate::error::StateError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// What the last run saw for one card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardState {
    /// Checklist name → checklist id
    #[serde(default)]
    pub checklists: BTreeMap<String, String>,
    /// End of the last successful sync of this card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// Run state for every card ever synced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunState {
    cards: BTreeMap<String, CardState>,
}

impl RunState {
    /// Create empty state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load state from `path`
    ///
    /// A missing file is a first run. An unreadable or malformed file is
    /// logged and treated the same way.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read state file, starting fresh");
                return Self::new();
            }
        };
        match serde_json::from_str(&text) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "malformed state file, starting fresh");
                Self::new()
            }
        }
    }

    /// Write state to `path`, replacing the previous file atomically
    ///
    /// # Errors
    /// Returns `StateError` if the file cannot be encoded, written or moved
    /// into place.
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| StateError::io_error(path, e))?;
        serde_json::to_writer_pretty(&mut tmp, self)?;
        tmp.write_all(b"\n")
            .map_err(|e| StateError::io_error(path, e))?;
        tmp.persist(path).map_err(|e| StateError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;
        tracing::debug!(path = %path.display(), cards = self.cards.len(), "saved run state");
        Ok(())
    }

    /// Record a completed sync of `card_id`
    ///
    /// Checklist ids are merged into what earlier runs recorded.
    pub fn record_card(
        &mut self,
        card_id: &str,
        checklists: &BTreeMap<String, String>,
        synced_at: DateTime<Utc>,
    ) {
        let card = self.cards.entry(card_id.to_string()).or_default();
        card.checklists
            .extend(checklists.iter().map(|(name, id)| (name.clone(), id.clone())));
        card.last_synced_at = Some(synced_at);
    }

    /// State recorded for `card_id`
    #[inline]
    #[must_use]
    pub fn card(&self, card_id: &str) -> Option<&CardState> {
        self.cards.get(card_id)
    }

    /// Number of cards recorded
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether no card has been recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
