//! Task-board seam
//!
//! The reconcilers talk to the board only through [`BoardClient`], so they can
//! run against the real REST client or an in-memory board in tests.

use crate::error::RemoteError;
use crate::model::{ItemState, RemoteCard, RemoteChecklist, RemoteComment, RemoteItem};
use async_trait::async_trait;

/// Task-board operations used by the sync
///
/// Each method is a single remote call. Implementations do not retry.
#[async_trait]
pub trait BoardClient: Send + Sync {
    /// Read a card with all its checklists and comments
    async fn fetch_card(&self, card_id: &str) -> Result<RemoteCard, RemoteError>;

    /// Create an empty checklist on a card
    async fn create_checklist(
        &self,
        card_id: &str,
        name: &str,
    ) -> Result<RemoteChecklist, RemoteError>;

    /// Add an item to a checklist
    async fn create_check_item(
        &self,
        checklist_id: &str,
        name: &str,
        checked: bool,
    ) -> Result<RemoteItem, RemoteError>;

    /// Change the completion state of an item
    async fn set_check_item_state(
        &self,
        card_id: &str,
        item_id: &str,
        state: ItemState,
    ) -> Result<(), RemoteError>;

    /// Remove an item from a checklist
    async fn delete_check_item(&self, checklist_id: &str, item_id: &str)
        -> Result<(), RemoteError>;

    /// Post a new comment on a card
    async fn create_comment(&self, card_id: &str, text: &str)
        -> Result<RemoteComment, RemoteError>;

    /// Replace the text of an existing comment
    async fn update_comment(&self, comment_id: &str, text: &str) -> Result<(), RemoteError>;
}
