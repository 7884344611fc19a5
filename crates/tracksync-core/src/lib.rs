//! tracksync Core - one-way progress sync
//!
//! Keeps a task-board card in line with a progress document:
//! - Milestones become checklists, tasks become checklist items
//! - Daily log entries become card comments
//! - Entries are processed one at a time and failures stay local to the
//!   entry or write that caused them
//!
//! # Example
//!
//! ```rust,ignore
//! use tracksync_core::{RunState, Settings, SyncConfig, SyncCoordinator};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::from_env()?;
//! let config = SyncConfig::load(Path::new("config.json"))?;
//! let source = settings.document_source()?;
//! let board = settings.board_client()?;
//!
//! let mut state = RunState::load(Path::new("sync_state.json"));
//! let coordinator = SyncCoordinator::new(&source, &board, config.markers.clone());
//! let report = coordinator.run(&config, &mut state).await;
//! state.save(Path::new("sync_state.json"))?;
//!
//! println!("clean: {}", report.is_clean());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod coordinator;
pub mod error;
pub mod logs;
pub mod milestones;
pub mod outcome;
pub mod settings;
pub mod state;

// Re-exports for convenience
pub use config::{InvalidEntry, SyncConfig, TrackedEntry};
pub use coordinator::SyncCoordinator;
pub use error::{ConfigError, StateError, SyncError, SyncResult};
pub use logs::reconcile_logs;
pub use milestones::{reconcile_milestones, MilestoneSync};
pub use outcome::{
    EntryOutcome, EntryStatus, Operation, OperationFailure, PassOutcome, ReconcileStats,
    RunReport,
};
pub use settings::{GitHubSettings, Settings, TrelloSettings};
pub use state::{CardState, RunState};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running a sync
    pub use crate::{
        EntryOutcome, EntryStatus, RunReport, RunState, Settings, SyncConfig, SyncCoordinator,
        SyncError, TrackedEntry,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
