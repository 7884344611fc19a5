//! Property tests for milestone reconciliation.
//!
//! - After one pass the checklist holds exactly the parsed tasks, duplicates
//!   and states included.
//! - A second pass against the result issues no writes.

use indexmap::IndexMap;
use proptest::prelude::*;
use tracksync_core::reconcile_milestones;
use tracksync_document::Task;
use tracksync_remote::ItemState;
use tracksync_test_utils::{item, FakeBoard};

fn task_strategy() -> impl Strategy<Value = (String, bool)> {
    (prop::sample::select(vec!["Setup env", "Write tests", "Review", "Ship"]), any::<bool>())
        .prop_map(|(name, checked)| (name.to_string(), checked))
}

fn sorted(mut pairs: Vec<(String, bool)>) -> Vec<(String, bool)> {
    pairs.sort();
    pairs
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn checklist_mirrors_tasks(
        remote in prop::collection::vec(task_strategy(), 0..8),
        parsed in prop::collection::vec(task_strategy(), 0..8),
    ) {
        let board = FakeBoard::new();
        let items = remote
            .iter()
            .enumerate()
            .map(|(i, (name, checked))| item(&format!("it{i}"), name, ItemState::from_checked(*checked)))
            .collect();
        board.add_checklist("card1", "cl1", "Week 1", items);

        let milestones: IndexMap<String, Vec<Task>> = IndexMap::from([(
            "Week 1".to_string(),
            parsed.iter().map(|(name, checked)| Task::new(name.clone(), *checked)).collect(),
        )]);

        let rt = runtime();
        let card = board.snapshot("card1");
        let sync = rt.block_on(reconcile_milestones(&board, "card1", &card, &milestones));
        prop_assert!(sync.outcome.failures.is_empty());

        let after = board.snapshot("card1");
        let mirrored: Vec<(String, bool)> = after.checklists[0]
            .items
            .iter()
            .map(|i| (i.name.clone(), i.state.is_complete()))
            .collect();
        prop_assert_eq!(sorted(mirrored), sorted(parsed.clone()));

        board.clear_calls();
        let again = rt.block_on(reconcile_milestones(&board, "card1", &after, &milestones));
        prop_assert_eq!(again.outcome.stats.writes(), 0);
        prop_assert_eq!(board.write_count(), 0);
    }
}
