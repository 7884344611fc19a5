//! Milestone → checklist reconciliation
//!
//! Each milestone maps to the checklist with the same name. Inside a
//! checklist the remote items are made an exact mirror of the parsed tasks:
//! - a task with no matching item is created with its parsed state
//! - a matched item whose state differs is updated
//! - every item not claimed by a task is deleted, including surplus duplicates
//!
//! Items are claimed by exact name, first unclaimed match in board order, so
//! two tasks with the same text map to two distinct items. Checklists whose
//! name no longer appears in the document are left alone.

use crate::outcome::{Operation, PassOutcome};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracksync_document::Task;
use tracksync_remote::{BoardClient, ItemState, RemoteCard, RemoteChecklist};

/// Result of the milestone pass for one card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneSync {
    /// Counts and failed writes
    pub outcome: PassOutcome,
    /// Milestone name → checklist id, for every checklist resolved or created
    pub checklist_ids: BTreeMap<String, String>,
}

/// Bring the card's checklists in line with the parsed milestones
///
/// Never fails as a whole: each failed write is recorded in the outcome and
/// the pass moves on. A checklist that cannot be created skips only its own
/// milestone.
pub async fn reconcile_milestones(
    board: &dyn BoardClient,
    card_id: &str,
    card: &RemoteCard,
    milestones: &IndexMap<String, Vec<Task>>,
) -> MilestoneSync {
    let mut sync = MilestoneSync::default();

    for (milestone, tasks) in milestones {
        let checklist = match card.checklists.iter().find(|c| c.name == *milestone) {
            Some(existing) => Cow::Borrowed(existing),
            None => match board.create_checklist(card_id, milestone).await {
                Ok(created) => {
                    tracing::info!(card = card_id, milestone = %milestone, "created checklist");
                    sync.outcome.stats.created += 1;
                    Cow::Owned(created)
                }
                Err(e) => {
                    sync.outcome
                        .record_failure(Operation::CreateChecklist, milestone.as_str(), &e);
                    continue;
                }
            },
        };

        sync.checklist_ids
            .insert(milestone.clone(), checklist.id.clone());
        reconcile_items(board, card_id, milestone, &checklist, tasks, &mut sync.outcome).await;
    }

    sync
}

async fn reconcile_items(
    board: &dyn BoardClient,
    card_id: &str,
    milestone: &str,
    checklist: &RemoteChecklist,
    tasks: &[Task],
    outcome: &mut PassOutcome,
) {
    let items = &checklist.items;
    let mut claimed = vec![false; items.len()];

    for task in tasks {
        let target = || format!("{milestone} / {}", task.name);
        let wanted = ItemState::from_checked(task.checked);

        let Some(index) = (0..items.len()).find(|&i| !claimed[i] && items[i].name == task.name)
        else {
            match board
                .create_check_item(&checklist.id, &task.name, task.checked)
                .await
            {
                Ok(_) => {
                    tracing::info!(milestone, task = %task.name, state = %wanted, "created item");
                    outcome.stats.created += 1;
                }
                Err(e) => outcome.record_failure(Operation::CreateItem, target(), &e),
            }
            continue;
        };

        claimed[index] = true;
        let item = &items[index];
        if item.state == wanted {
            tracing::debug!(milestone, task = %task.name, "item unchanged");
            outcome.stats.unchanged += 1;
            continue;
        }

        match board.set_check_item_state(card_id, &item.id, wanted).await {
            Ok(()) => {
                tracing::info!(milestone, task = %task.name, from = %item.state, to = %wanted, "updated item");
                outcome.stats.updated += 1;
            }
            Err(e) => outcome.record_failure(Operation::UpdateItem, target(), &e),
        }
    }

    for (item, _) in items.iter().zip(&claimed).filter(|(_, claimed)| !**claimed) {
        match board.delete_check_item(&checklist.id, &item.id).await {
            Ok(()) => {
                tracing::info!(milestone, task = %item.name, "deleted item");
                outcome.stats.deleted += 1;
            }
            Err(e) => outcome.record_failure(
                Operation::DeleteItem,
                format!("{milestone} / {}", item.name),
                &e,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracksync_remote::RemoteItem;
    use tracksync_test_utils::{BoardCall, FakeBoard};

    fn item(id: &str, name: &str, state: ItemState) -> RemoteItem {
        RemoteItem {
            id: id.into(),
            name: name.into(),
            state,
        }
    }

    fn milestones(entries: &[(&str, &[(&str, bool)])]) -> IndexMap<String, Vec<Task>> {
        entries
            .iter()
            .map(|(name, tasks)| {
                (
                    (*name).to_string(),
                    tasks.iter().map(|(t, c)| Task::new(*t, *c)).collect(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn week_one_updates_and_creates() {
        let board = FakeBoard::new();
        board.add_checklist(
            "card1",
            "cl1",
            "Week 1",
            vec![item("it1", "Setup env", ItemState::Incomplete)],
        );
        let card = board.snapshot("card1");

        let sync = reconcile_milestones(
            &board,
            "card1",
            &card,
            &milestones(&[("Week 1", &[("Setup env", true), ("Write tests", false)])]),
        )
        .await;

        assert_eq!(sync.outcome.stats.updated, 1);
        assert_eq!(sync.outcome.stats.created, 1);
        assert_eq!(sync.outcome.stats.deleted, 0);
        assert!(sync.outcome.failures.is_empty());
        assert_eq!(sync.checklist_ids["Week 1"], "cl1");
        assert_eq!(
            board.calls(),
            vec![
                BoardCall::SetCheckItemState {
                    card_id: "card1".into(),
                    item_id: "it1".into(),
                    state: ItemState::Complete,
                },
                BoardCall::CreateCheckItem {
                    checklist_id: "cl1".into(),
                    name: "Write tests".into(),
                    checked: false,
                },
            ]
        );
    }

    #[tokio::test]
    async fn removed_task_is_deleted() {
        let board = FakeBoard::new();
        board.add_checklist(
            "card1",
            "cl1",
            "Week 1",
            vec![
                item("it1", "Setup env", ItemState::Complete),
                item("it2", "Old task", ItemState::Incomplete),
            ],
        );
        let card = board.snapshot("card1");

        let sync = reconcile_milestones(
            &board,
            "card1",
            &card,
            &milestones(&[("Week 1", &[("Setup env", true)])]),
        )
        .await;

        assert_eq!(sync.outcome.stats.deleted, 1);
        assert_eq!(sync.outcome.stats.writes(), 1);
        assert_eq!(
            board.calls(),
            vec![BoardCall::DeleteCheckItem {
                checklist_id: "cl1".into(),
                item_id: "it2".into(),
            }]
        );
    }

    #[tokio::test]
    async fn missing_checklist_is_created_with_items() {
        let board = FakeBoard::new();
        board.add_card("card1");
        let card = board.snapshot("card1");

        let sync = reconcile_milestones(
            &board,
            "card1",
            &card,
            &milestones(&[("Week 2", &[("Ship it", false), ("Demo", true)])]),
        )
        .await;

        assert_eq!(sync.outcome.stats.created, 3);
        let after = board.snapshot("card1");
        assert_eq!(after.checklists.len(), 1);
        assert_eq!(after.checklists[0].name, "Week 2");
        assert_eq!(after.checklists[0].items[1].state, ItemState::Complete);
        assert_eq!(sync.checklist_ids["Week 2"], after.checklists[0].id);
    }

    #[tokio::test]
    async fn duplicate_names_claim_distinct_items() {
        let board = FakeBoard::new();
        board.add_checklist(
            "card1",
            "cl1",
            "Week 1",
            vec![
                item("it1", "Review", ItemState::Complete),
                item("it2", "Review", ItemState::Incomplete),
                item("it3", "Review", ItemState::Incomplete),
            ],
        );
        let card = board.snapshot("card1");

        let sync = reconcile_milestones(
            &board,
            "card1",
            &card,
            &milestones(&[("Week 1", &[("Review", true), ("Review", false)])]),
        )
        .await;

        assert_eq!(sync.outcome.stats.unchanged, 2);
        assert_eq!(
            board.calls(),
            vec![BoardCall::DeleteCheckItem {
                checklist_id: "cl1".into(),
                item_id: "it3".into(),
            }]
        );
    }

    #[tokio::test]
    async fn item_names_are_case_sensitive() {
        let board = FakeBoard::new();
        board.add_checklist(
            "card1",
            "cl1",
            "Week 1",
            vec![item("it1", "setup env", ItemState::Incomplete)],
        );
        let card = board.snapshot("card1");

        let sync = reconcile_milestones(
            &board,
            "card1",
            &card,
            &milestones(&[("Week 1", &[("Setup env", false)])]),
        )
        .await;

        assert_eq!(sync.outcome.stats.created, 1);
        assert_eq!(sync.outcome.stats.deleted, 1);
    }

    #[tokio::test]
    async fn first_checklist_with_name_wins() {
        let board = FakeBoard::new();
        board.add_checklist("card1", "clA", "Week 1", vec![]);
        board.add_checklist(
            "card1",
            "clB",
            "Week 1",
            vec![item("it9", "Keep me", ItemState::Incomplete)],
        );
        let card = board.snapshot("card1");

        let sync = reconcile_milestones(
            &board,
            "card1",
            &card,
            &milestones(&[("Week 1", &[("Task", false)])]),
        )
        .await;

        assert_eq!(sync.checklist_ids["Week 1"], "clA");
        assert!(board
            .calls()
            .iter()
            .all(|c| !matches!(c, BoardCall::DeleteCheckItem { .. })));
    }

    #[tokio::test]
    async fn failed_checklist_creation_skips_only_that_milestone() {
        let board = FakeBoard::new();
        board.add_checklist("card1", "cl1", "Week 1", vec![]);
        board.fail_checklist("Week 2");
        let card = board.snapshot("card1");

        let sync = reconcile_milestones(
            &board,
            "card1",
            &card,
            &milestones(&[
                ("Week 2", &[("Blocked", false)]),
                ("Week 1", &[("Setup env", false)]),
            ]),
        )
        .await;

        assert_eq!(sync.outcome.failures.len(), 1);
        assert_eq!(sync.outcome.failures[0].operation, Operation::CreateChecklist);
        assert_eq!(sync.outcome.failures[0].target, "Week 2");
        assert_eq!(sync.outcome.stats.created, 1);
        assert!(!sync.checklist_ids.contains_key("Week 2"));
    }

    #[tokio::test]
    async fn failed_item_write_does_not_stop_siblings() {
        let board = FakeBoard::new();
        board.add_checklist("card1", "cl1", "Week 1", vec![]);
        board.fail_item("Broken");
        let card = board.snapshot("card1");

        let sync = reconcile_milestones(
            &board,
            "card1",
            &card,
            &milestones(&[("Week 1", &[("Broken", false), ("Fine", false)])]),
        )
        .await;

        assert_eq!(sync.outcome.stats.failed, 1);
        assert_eq!(sync.outcome.stats.created, 1);
        assert_eq!(sync.outcome.failures[0].target, "Week 1 / Broken");
    }

    #[tokio::test]
    async fn unrelated_checklists_are_kept() {
        let board = FakeBoard::new();
        board.add_checklist(
            "card1",
            "cl0",
            "Onboarding",
            vec![item("it0", "Badge", ItemState::Complete)],
        );
        let card = board.snapshot("card1");

        let sync = reconcile_milestones(&board, "card1", &card, &IndexMap::new()).await;

        assert_eq!(sync.outcome.stats.writes(), 0);
        assert!(board.calls().is_empty());
    }
}
