//! Testing utilities for tracksync workspace
//!
//! In-memory stand-ins for the two remote systems:
//! - [`FakeBoard`]: a stateful board that applies every write, records it, and
//!   can be told to fail specific operations
//! - [`StaticSource`]: documents served from a map
//!
//! plus a few document fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use reqwest::Method;
use std::collections::{BTreeMap, HashSet};
use tracksync_document::date_heading;
use tracksync_remote::{
    BoardClient, DocumentSource, ItemState, RemoteCard, RemoteChecklist, RemoteComment,
    RemoteError, RemoteItem,
};

/// Base URL used in injected errors
const FAKE_URL: &str = "https://board.invalid/1";

/// A write received by [`FakeBoard`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCall {
    CreateChecklist {
        card_id: String,
        name: String,
    },
    CreateCheckItem {
        checklist_id: String,
        name: String,
        checked: bool,
    },
    SetCheckItemState {
        card_id: String,
        item_id: String,
        state: ItemState,
    },
    DeleteCheckItem {
        checklist_id: String,
        item_id: String,
    },
    CreateComment {
        card_id: String,
        text: String,
    },
    UpdateComment {
        comment_id: String,
        text: String,
    },
}

#[derive(Debug, Default)]
struct BoardState {
    cards: BTreeMap<String, RemoteCard>,
    calls: Vec<BoardCall>,
    fetches: usize,
    next_id: u64,
    failing_fetches: HashSet<String>,
    failing_checklists: HashSet<String>,
    failing_items: HashSet<String>,
    failing_comments: HashSet<NaiveDate>,
}

impl BoardState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn card_mut(&mut self, card_id: &str) -> &mut RemoteCard {
        self.cards
            .entry(card_id.to_string())
            .or_insert_with(|| RemoteCard {
                id: card_id.to_string(),
                ..RemoteCard::default()
            })
    }

    fn checklist_mut(&mut self, checklist_id: &str) -> Option<&mut RemoteChecklist> {
        self.cards
            .values_mut()
            .flat_map(|card| card.checklists.iter_mut())
            .find(|c| c.id == checklist_id)
    }
}

/// In-memory board
///
/// Writes mutate the stored cards, so a second reconciliation against a
/// fresh [`FakeBoard::snapshot`] sees the result of the first. Only writes
/// are recorded in [`FakeBoard::calls`]; fetches are counted separately.
#[derive(Debug, Default)]
pub struct FakeBoard {
    state: Mutex<BoardState>,
}

impl FakeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure an empty card exists
    pub fn add_card(&self, card_id: &str) {
        self.state.lock().card_mut(card_id);
    }

    /// Append a checklist to a card
    pub fn add_checklist(&self, card_id: &str, id: &str, name: &str, items: Vec<RemoteItem>) {
        self.state
            .lock()
            .card_mut(card_id)
            .checklists
            .push(RemoteChecklist {
                id: id.into(),
                name: name.into(),
                items,
            });
    }

    /// Append a comment; earlier comments come first in fetch order
    pub fn add_comment(&self, card_id: &str, id: &str, text: &str) {
        self.state
            .lock()
            .card_mut(card_id)
            .comments
            .push(RemoteComment::new(id, text));
    }

    /// Current contents of a card, as a fetch would return them
    pub fn snapshot(&self, card_id: &str) -> RemoteCard {
        self.state.lock().card_mut(card_id).clone()
    }

    /// Writes received so far, in order
    pub fn calls(&self) -> Vec<BoardCall> {
        self.state.lock().calls.clone()
    }

    /// Number of writes received
    pub fn write_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Number of card fetches received
    pub fn fetch_count(&self) -> usize {
        self.state.lock().fetches
    }

    /// Forget recorded writes, keeping card contents
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Make fetching `card_id` fail
    pub fn fail_fetch(&self, card_id: &str) {
        self.state.lock().failing_fetches.insert(card_id.into());
    }

    /// Make creating a checklist named `name` fail
    pub fn fail_checklist(&self, name: &str) {
        self.state.lock().failing_checklists.insert(name.into());
    }

    /// Make every write touching an item named `name` fail
    pub fn fail_item(&self, name: &str) {
        self.state.lock().failing_items.insert(name.into());
    }

    /// Make every comment write for `date` fail
    pub fn fail_comment(&self, date: NaiveDate) {
        self.state.lock().failing_comments.insert(date);
    }
}

fn injected(method: Method, path: &str) -> RemoteError {
    RemoteError::status(method, format!("{FAKE_URL}{path}"), 500, "injected failure")
}

fn comment_date(text: &str) -> Option<NaiveDate> {
    text.trim().lines().next().and_then(|line| date_heading(line.trim()))
}

#[async_trait]
impl BoardClient for FakeBoard {
    async fn fetch_card(&self, card_id: &str) -> Result<RemoteCard, RemoteError> {
        let mut state = self.state.lock();
        state.fetches += 1;
        if state.failing_fetches.contains(card_id) {
            return Err(injected(Method::GET, &format!("/cards/{card_id}")));
        }
        state
            .cards
            .get(card_id)
            .cloned()
            .ok_or_else(|| RemoteError::status(Method::GET, format!("{FAKE_URL}/cards/{card_id}"), 404, "card not found"))
    }

    async fn create_checklist(
        &self,
        card_id: &str,
        name: &str,
    ) -> Result<RemoteChecklist, RemoteError> {
        let mut state = self.state.lock();
        if state.failing_checklists.contains(name) {
            return Err(injected(Method::POST, "/checklists"));
        }
        state.calls.push(BoardCall::CreateChecklist {
            card_id: card_id.into(),
            name: name.into(),
        });
        let checklist = RemoteChecklist {
            id: state.next_id("cl"),
            name: name.into(),
            items: Vec::new(),
        };
        state.card_mut(card_id).checklists.push(checklist.clone());
        Ok(checklist)
    }

    async fn create_check_item(
        &self,
        checklist_id: &str,
        name: &str,
        checked: bool,
    ) -> Result<RemoteItem, RemoteError> {
        let mut state = self.state.lock();
        if state.failing_items.contains(name) {
            return Err(injected(
                Method::POST,
                &format!("/checklists/{checklist_id}/checkItems"),
            ));
        }
        state.calls.push(BoardCall::CreateCheckItem {
            checklist_id: checklist_id.into(),
            name: name.into(),
            checked,
        });
        let item = RemoteItem {
            id: state.next_id("it"),
            name: name.into(),
            state: ItemState::from_checked(checked),
        };
        match state.checklist_mut(checklist_id) {
            Some(checklist) => {
                checklist.items.push(item.clone());
                Ok(item)
            }
            None => Err(RemoteError::status(
                Method::POST,
                format!("{FAKE_URL}/checklists/{checklist_id}/checkItems"),
                404,
                "checklist not found",
            )),
        }
    }

    async fn set_check_item_state(
        &self,
        card_id: &str,
        item_id: &str,
        item_state: ItemState,
    ) -> Result<(), RemoteError> {
        let mut state = self.state.lock();
        let path = format!("/cards/{card_id}/checkItem/{item_id}");
        let failing = state.failing_items.clone();
        let item = state
            .card_mut(card_id)
            .checklists
            .iter_mut()
            .flat_map(|c| c.items.iter_mut())
            .find(|i| i.id == item_id);
        let Some(item) = item else {
            return Err(RemoteError::status(
                Method::PUT,
                format!("{FAKE_URL}{path}"),
                404,
                "item not found",
            ));
        };
        if failing.contains(&item.name) {
            return Err(injected(Method::PUT, &path));
        }
        item.state = item_state;
        state.calls.push(BoardCall::SetCheckItemState {
            card_id: card_id.into(),
            item_id: item_id.into(),
            state: item_state,
        });
        Ok(())
    }

    async fn delete_check_item(
        &self,
        checklist_id: &str,
        item_id: &str,
    ) -> Result<(), RemoteError> {
        let mut state = self.state.lock();
        let path = format!("/checklists/{checklist_id}/checkItems/{item_id}");
        let failing = state.failing_items.clone();
        let Some(checklist) = state.checklist_mut(checklist_id) else {
            return Err(RemoteError::status(
                Method::DELETE,
                format!("{FAKE_URL}{path}"),
                404,
                "checklist not found",
            ));
        };
        let Some(index) = checklist.items.iter().position(|i| i.id == item_id) else {
            return Err(RemoteError::status(
                Method::DELETE,
                format!("{FAKE_URL}{path}"),
                404,
                "item not found",
            ));
        };
        if failing.contains(&checklist.items[index].name) {
            return Err(injected(Method::DELETE, &path));
        }
        checklist.items.remove(index);
        state.calls.push(BoardCall::DeleteCheckItem {
            checklist_id: checklist_id.into(),
            item_id: item_id.into(),
        });
        Ok(())
    }

    async fn create_comment(&self, card_id: &str, text: &str) -> Result<RemoteComment, RemoteError> {
        let mut state = self.state.lock();
        if comment_date(text).is_some_and(|d| state.failing_comments.contains(&d)) {
            return Err(injected(
                Method::POST,
                &format!("/cards/{card_id}/actions/comments"),
            ));
        }
        state.calls.push(BoardCall::CreateComment {
            card_id: card_id.into(),
            text: text.into(),
        });
        let comment = RemoteComment::new(state.next_id("ac"), text);
        // The board lists newest comments first.
        state.card_mut(card_id).comments.insert(0, comment.clone());
        Ok(comment)
    }

    async fn update_comment(&self, comment_id: &str, text: &str) -> Result<(), RemoteError> {
        let mut state = self.state.lock();
        let path = format!("/actions/{comment_id}");
        if comment_date(text).is_some_and(|d| state.failing_comments.contains(&d)) {
            return Err(injected(Method::PUT, &path));
        }
        let comment = state
            .cards
            .values_mut()
            .flat_map(|card| card.comments.iter_mut())
            .find(|c| c.id == comment_id);
        let Some(comment) = comment else {
            return Err(RemoteError::status(
                Method::PUT,
                format!("{FAKE_URL}{path}"),
                404,
                "comment not found",
            ));
        };
        *comment = RemoteComment::new(comment_id, text);
        state.calls.push(BoardCall::UpdateComment {
            comment_id: comment_id.into(),
            text: text.into(),
        });
        Ok(())
    }
}

/// Documents served from memory, keyed by branch and path
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    documents: BTreeMap<(String, String), String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `text` for `path` on `branch`
    #[must_use]
    pub fn with_document(mut self, branch: &str, path: &str, text: &str) -> Self {
        self.documents
            .insert((branch.to_string(), path.to_string()), text.to_string());
        self
    }
}

#[async_trait]
impl DocumentSource for StaticSource {
    async fn fetch_document(&self, branch: &str, path: &str) -> Result<String, RemoteError> {
        self.documents
            .get(&(branch.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| {
                RemoteError::status(
                    Method::GET,
                    format!("https://source.invalid/contents/{path}"),
                    404,
                    "Not Found",
                )
            })
    }
}

/// Document from the "Week 1" walkthrough: one ticked and one open task
pub const WEEK_ONE_DOCUMENT: &str = "\
# Ada's progress

## 🏁 Milestones
### Week 1
- [x] Setup env
- [ ] Write tests

## 📆 Daily Logs
### 2024-01-05
Paired on the parser.
---
### 2024-01-06 (Sat)
Read the board API docs.
---
";

/// Item with the given fields
pub fn item(id: &str, name: &str, state: ItemState) -> RemoteItem {
    RemoteItem {
        id: id.into(),
        name: name.into(),
        state,
    }
}
