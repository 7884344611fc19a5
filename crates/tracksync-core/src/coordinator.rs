//! Batch driver
//!
//! Walks the configured entries one at a time. For each: fetch the document,
//! parse it, fetch the card, reconcile milestones, reconcile logs, record the
//! card in the run state. A failed fetch skips the entry; nothing stops the
//! batch.

use crate::config::{SyncConfig, TrackedEntry};
use crate::logs::reconcile_logs;
use crate::milestones::reconcile_milestones;
use crate::outcome::{EntryOutcome, RunReport};
use crate::state::RunState;
use chrono::Utc;
use tracing::Instrument;
use tracksync_document::{DocumentParser, SectionMarkers};
use tracksync_remote::{BoardClient, DocumentSource};

/// Runs a sync batch against a document source and a board
pub struct SyncCoordinator<'a> {
    source: &'a dyn DocumentSource,
    board: &'a dyn BoardClient,
    parser: DocumentParser,
}

impl<'a> SyncCoordinator<'a> {
    /// Create coordinator parsing documents with `markers`
    #[must_use]
    pub fn new(
        source: &'a dyn DocumentSource,
        board: &'a dyn BoardClient,
        markers: SectionMarkers,
    ) -> Self {
        Self {
            source,
            board,
            parser: DocumentParser::new(markers),
        }
    }

    /// Sync every entry in `config`, strictly in order
    ///
    /// Invalid config entries are reported first. `state` is updated in
    /// memory for each card that was reconciled; persisting it is up to the
    /// caller.
    pub async fn run(&self, config: &SyncConfig, state: &mut RunState) -> RunReport {
        let mut report = RunReport::default();
        report
            .entries
            .extend(config.invalid.iter().map(EntryOutcome::invalid));

        tracing::info!(entries = config.entries.len(), "starting sync");
        for entry in &config.entries {
            let span = tracing::info_span!("entry", name = %entry.name, card = %entry.card_id);
            let outcome = self.sync_entry(entry, state).instrument(span).await;
            report.entries.push(outcome);
        }

        report
    }

    /// Sync a single entry
    pub async fn sync_entry(&self, entry: &TrackedEntry, state: &mut RunState) -> EntryOutcome {
        let text = match self
            .source
            .fetch_document(&entry.branch, &entry.file_path)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, branch = %entry.branch, path = %entry.file_path, "document fetch failed");
                return EntryOutcome::failed(entry, format!("document fetch failed: {e}"));
            }
        };

        let document = self.parser.parse(&text);
        tracing::info!(
            milestones = document.milestones.len(),
            tasks = document.task_count(),
            logs = document.daily_logs.len(),
            "parsed document"
        );
        if document.is_empty() {
            tracing::warn!(path = %entry.file_path, "document has no milestones or daily logs");
        }

        let card = match self.board.fetch_card(&entry.card_id).await {
            Ok(card) => card,
            Err(e) => {
                tracing::error!(error = %e, "card fetch failed");
                return EntryOutcome::failed(entry, format!("card fetch failed: {e}"));
            }
        };

        let milestones =
            reconcile_milestones(self.board, &entry.card_id, &card, &document.milestones).await;
        let logs = reconcile_logs(self.board, &entry.card_id, &card, &document.daily_logs).await;

        state.record_card(&entry.card_id, &milestones.checklist_ids, Utc::now());
        EntryOutcome::synced(entry, milestones.outcome, logs)
    }
}

impl std::fmt::Debug for SyncCoordinator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCoordinator")
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvalidEntry;
    use crate::outcome::EntryStatus;
    use tracksync_test_utils::{FakeBoard, StaticSource};

    const DOC: &str = "\
## 🏁 Milestones
### Week 1
- [x] Setup env

## 📆 Daily Logs
### 2024-01-05
Paired on parser
---
";

    fn config(entries: Vec<TrackedEntry>) -> SyncConfig {
        SyncConfig {
            entries,
            ..SyncConfig::default()
        }
    }

    #[tokio::test]
    async fn syncs_entry_and_records_state() {
        let source = StaticSource::new().with_document("ada/log", "logs/ada.md", DOC);
        let board = FakeBoard::new();
        board.add_card("card1");
        let coordinator = SyncCoordinator::new(&source, &board, SectionMarkers::default());
        let mut state = RunState::new();

        let report = coordinator
            .run(
                &config(vec![TrackedEntry::new("Ada", "ada/log", "logs/ada.md", "card1")]),
                &mut state,
            )
            .await;

        assert!(report.is_clean());
        assert_eq!(report.entries[0].status, EntryStatus::Synced);
        assert_eq!(report.entries[0].milestones.stats.created, 2);
        assert_eq!(report.entries[0].logs.stats.created, 1);

        let recorded = state.card("card1").unwrap();
        assert!(recorded.checklists.contains_key("Week 1"));
        assert!(recorded.last_synced_at.is_some());
    }

    #[tokio::test]
    async fn document_fetch_failure_skips_entry() {
        let source = StaticSource::new().with_document("bob/log", "logs/bob.md", DOC);
        let board = FakeBoard::new();
        board.add_card("card1");
        board.add_card("card2");
        let coordinator = SyncCoordinator::new(&source, &board, SectionMarkers::default());
        let mut state = RunState::new();

        let report = coordinator
            .run(
                &config(vec![
                    TrackedEntry::new("Ada", "ada/log", "logs/ada.md", "card1"),
                    TrackedEntry::new("Bob", "bob/log", "logs/bob.md", "card2"),
                ]),
                &mut state,
            )
            .await;

        assert!(matches!(report.entries[0].status, EntryStatus::Failed { .. }));
        assert_eq!(report.entries[1].status, EntryStatus::Synced);
        assert!(state.card("card1").is_none());
        assert!(state.card("card2").is_some());
        assert_eq!(board.fetch_count(), 1);
    }

    #[tokio::test]
    async fn card_fetch_failure_issues_no_writes() {
        let source = StaticSource::new().with_document("ada/log", "logs/ada.md", DOC);
        let board = FakeBoard::new();
        board.fail_fetch("card1");
        let coordinator = SyncCoordinator::new(&source, &board, SectionMarkers::default());

        let outcome = coordinator
            .sync_entry(
                &TrackedEntry::new("Ada", "ada/log", "logs/ada.md", "card1"),
                &mut RunState::new(),
            )
            .await;

        match outcome.status {
            EntryStatus::Failed { reason } => assert!(reason.starts_with("card fetch failed")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(board.write_count(), 0);
    }

    #[tokio::test]
    async fn invalid_entries_lead_the_report() {
        let source = StaticSource::new();
        let board = FakeBoard::new();
        let coordinator = SyncCoordinator::new(&source, &board, SectionMarkers::default());
        let config = SyncConfig {
            invalid: vec![InvalidEntry {
                index: 0,
                name: Some("Eve".into()),
                reason: "missing branch".into(),
            }],
            ..SyncConfig::default()
        };

        let report = coordinator.run(&config, &mut RunState::new()).await;

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].name, "Eve");
        assert!(!report.is_clean());
    }
}
