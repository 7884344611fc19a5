//! Parsed progress document model
//!
//! Built fresh on every run and never persisted. Milestones keep the order in
//! which they appear in the document; daily logs are keyed by date and iterate
//! chronologically.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A checkbox line under a milestone
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    /// Task text, the natural key within its milestone
    pub name: String,
    /// Whether the checkbox is ticked (`[x]`)
    pub checked: bool,
}

impl Task {
    /// Create new task
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, checked: bool) -> Self {
        Self {
            name: name.into(),
            checked,
        }
    }
}

/// Structured view of a progress document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressDocument {
    /// Milestone name → ordered task list, in document order
    pub milestones: IndexMap<String, Vec<Task>>,
    /// Log date → full entry text, starting with the canonical date heading
    pub daily_logs: BTreeMap<NaiveDate, String>,
}

impl ProgressDocument {
    /// Create empty document
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of tasks across all milestones
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.milestones.values().map(Vec::len).sum()
    }

    /// Whether the document has neither milestones nor logs
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty() && self.daily_logs.is_empty()
    }
}
