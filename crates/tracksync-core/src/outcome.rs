//! Per-entry outcomes and the end-of-run report

use crate::config::{InvalidEntry, TrackedEntry};
use serde::Serialize;
use tracksync_remote::RemoteError;

/// Kind of remote write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Create a checklist for a milestone
    CreateChecklist,
    /// Create a checklist item for a task
    CreateItem,
    /// Change an item's completion state
    UpdateItem,
    /// Delete an item no longer in the document
    DeleteItem,
    /// Post a comment for a log entry
    CreateComment,
    /// Rewrite a comment whose log entry changed
    UpdateComment,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CreateChecklist => "create checklist",
            Self::CreateItem => "create item",
            Self::UpdateItem => "update item",
            Self::DeleteItem => "delete item",
            Self::CreateComment => "create comment",
            Self::UpdateComment => "update comment",
        };
        f.write_str(name)
    }
}

/// A single remote write that failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationFailure {
    /// What was attempted
    pub operation: Operation,
    /// Milestone, task or log date the write was for
    pub target: String,
    /// Error text
    pub message: String,
}

/// Counts for one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Resources created
    pub created: usize,
    /// Resources updated in place
    pub updated: usize,
    /// Resources deleted
    pub deleted: usize,
    /// Resources already matching the document
    pub unchanged: usize,
    /// Writes that failed
    pub failed: usize,
}

impl ReconcileStats {
    /// Successful writes issued
    #[inline]
    #[must_use]
    pub fn writes(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

/// Result of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassOutcome {
    /// Counts
    pub stats: ReconcileStats,
    /// Failed writes, in the order they were attempted
    pub failures: Vec<OperationFailure>,
}

impl PassOutcome {
    /// Record a failed write and log it
    pub fn record_failure(
        &mut self,
        operation: Operation,
        target: impl Into<String>,
        error: &RemoteError,
    ) {
        let target = target.into();
        tracing::error!(%operation, target = %target, %error, "remote write failed");
        self.stats.failed += 1;
        self.failures.push(OperationFailure {
            operation,
            target,
            message: error.to_string(),
        });
    }
}

/// How an entry ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    /// Document and card were both fetched and reconciliation ran
    Synced,
    /// A fetch failed; nothing was written for this entry
    Failed {
        /// Why
        reason: String,
    },
    /// The config entry was unusable
    Invalid {
        /// Why
        reason: String,
    },
}

/// Outcome of one tracked entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOutcome {
    /// Entry label
    pub name: String,
    /// Target card, when known
    pub card_id: Option<String>,
    /// How the entry ended
    #[serde(flatten)]
    pub status: EntryStatus,
    /// Milestone → checklist pass
    pub milestones: PassOutcome,
    /// Daily log → comment pass
    pub logs: PassOutcome,
}

impl EntryOutcome {
    /// Entry that reached reconciliation
    #[must_use]
    pub fn synced(entry: &TrackedEntry, milestones: PassOutcome, logs: PassOutcome) -> Self {
        Self {
            name: entry.name.clone(),
            card_id: Some(entry.card_id.clone()),
            status: EntryStatus::Synced,
            milestones,
            logs,
        }
    }

    /// Entry skipped after a failed fetch
    #[must_use]
    pub fn failed(entry: &TrackedEntry, reason: impl Into<String>) -> Self {
        Self {
            name: entry.name.clone(),
            card_id: Some(entry.card_id.clone()),
            status: EntryStatus::Failed {
                reason: reason.into(),
            },
            milestones: PassOutcome::default(),
            logs: PassOutcome::default(),
        }
    }

    /// Entry rejected by config validation
    #[must_use]
    pub fn invalid(entry: &InvalidEntry) -> Self {
        Self {
            name: entry
                .name
                .clone()
                .unwrap_or_else(|| format!("entry #{}", entry.index)),
            card_id: None,
            status: EntryStatus::Invalid {
                reason: entry.reason.clone(),
            },
            milestones: PassOutcome::default(),
            logs: PassOutcome::default(),
        }
    }

    /// All failed writes for this entry
    pub fn failures(&self) -> impl Iterator<Item = &OperationFailure> {
        self.milestones.failures.iter().chain(&self.logs.failures)
    }

    /// Synced with every write succeeding
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        matches!(self.status, EntryStatus::Synced)
            && self.milestones.failures.is_empty()
            && self.logs.failures.is_empty()
    }
}

/// Report for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Invalid entries first, then processed entries in config order
    pub entries: Vec<EntryOutcome>,
    /// Set when the run state could not be written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_error: Option<String>,
}

impl RunReport {
    /// Whether every entry synced cleanly and the state was saved
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.state_error.is_none() && self.entries.iter().all(EntryOutcome::is_clean)
    }

    /// Entries that did not sync cleanly
    pub fn problems(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.entries.iter().filter(|e| !e.is_clean())
    }

    /// Log one summary line per entry
    pub fn log_summary(&self) {
        for entry in &self.entries {
            match &entry.status {
                EntryStatus::Synced => tracing::info!(
                    entry = %entry.name,
                    milestone_writes = entry.milestones.stats.writes(),
                    log_writes = entry.logs.stats.writes(),
                    failed = entry.milestones.stats.failed + entry.logs.stats.failed,
                    "entry synced"
                ),
                EntryStatus::Failed { reason } => {
                    tracing::error!(entry = %entry.name, %reason, "entry skipped");
                }
                EntryStatus::Invalid { reason } => {
                    tracing::warn!(entry = %entry.name, %reason, "entry invalid");
                }
            }
        }
        if let Some(error) = &self.state_error {
            tracing::error!(%error, "run state not saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error() -> RemoteError {
        RemoteError::decode("https://api.trello.com/1/checklists", "boom")
    }

    fn entry() -> TrackedEntry {
        TrackedEntry::new("Ada", "b", "p.md", "card1")
    }

    #[test]
    fn record_failure_counts_and_keeps_message() {
        let mut pass = PassOutcome::default();
        pass.record_failure(Operation::CreateChecklist, "Week 1", &status_error());
        assert_eq!(pass.stats.failed, 1);
        assert_eq!(pass.failures[0].target, "Week 1");
        assert!(pass.failures[0].message.contains("boom"));
    }

    #[test]
    fn clean_only_when_synced_without_failures() {
        let clean = EntryOutcome::synced(&entry(), PassOutcome::default(), PassOutcome::default());
        assert!(clean.is_clean());

        let mut dirty_logs = PassOutcome::default();
        dirty_logs.record_failure(Operation::CreateComment, "2024-01-05", &status_error());
        let dirty = EntryOutcome::synced(&entry(), PassOutcome::default(), dirty_logs);
        assert!(!dirty.is_clean());
        assert_eq!(dirty.failures().count(), 1);

        assert!(!EntryOutcome::failed(&entry(), "card fetch failed").is_clean());
    }

    #[test]
    fn report_cleanliness() {
        let mut report = RunReport::default();
        report
            .entries
            .push(EntryOutcome::synced(&entry(), PassOutcome::default(), PassOutcome::default()));
        assert!(report.is_clean());

        report.entries.push(EntryOutcome::invalid(&InvalidEntry {
            index: 3,
            name: None,
            reason: "missing name".into(),
        }));
        assert!(!report.is_clean());
        assert_eq!(report.problems().next().unwrap().name, "entry #3");
    }

    #[test]
    fn state_error_makes_report_unclean() {
        let report = RunReport {
            entries: Vec::new(),
            state_error: Some("disk full".into()),
        };
        assert!(!report.is_clean());
    }

    #[test]
    fn serializes_status_inline() {
        let outcome = EntryOutcome::failed(&entry(), "document fetch failed");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "document fetch failed");
        assert_eq!(json["card_id"], "card1");
    }

    #[test]
    fn operation_display() {
        assert_eq!(Operation::DeleteItem.to_string(), "delete item");
    }
}
