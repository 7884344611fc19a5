//! Remote card snapshot
//!
//! Domain view of a task-board card: its checklists with items, and its
//! comment history. Built from the board's JSON representation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracksync_document::date_heading;

/// Completion state of a checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    /// Ticked
    Complete,
    /// Not ticked
    Incomplete,
}

impl ItemState {
    /// State matching a checkbox flag
    #[inline]
    #[must_use]
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            Self::Complete
        } else {
            Self::Incomplete
        }
    }

    /// Whether the item is ticked
    #[inline]
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Wire name (`complete` / `incomplete`)
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Incomplete => "incomplete",
        }
    }
}

impl std::fmt::Display for ItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checklist item on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    /// Board-assigned id
    pub id: String,
    /// Item text
    pub name: String,
    /// Completion state
    pub state: ItemState,
}

/// Checklist on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteChecklist {
    /// Board-assigned id
    pub id: String,
    /// Checklist name, matched against milestone names
    pub name: String,
    /// Items in board order
    #[serde(rename = "checkItems", default)]
    pub items: Vec<RemoteItem>,
}

/// Comment on a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteComment {
    /// Board-assigned action id
    pub id: String,
    /// Comment body as stored
    pub text: String,
    /// Date of the leading `### YYYY-MM-DD` heading, if any
    pub extracted_date: Option<NaiveDate>,
}

impl RemoteComment {
    /// Create comment, recovering the log date from its first line
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let extracted_date = text.trim().lines().next().and_then(|first| date_heading(first.trim()));
        Self {
            id: id.into(),
            text,
            extracted_date,
        }
    }
}

/// Snapshot of a card: checklists and comments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteCard {
    /// Card id
    pub id: String,
    /// Card title
    pub name: String,
    /// Checklists in board order
    pub checklists: Vec<RemoteChecklist>,
    /// Comments, newest first as the board returns them
    pub comments: Vec<RemoteComment>,
}

/// Card as returned by `GET /cards/{id}?checklists=all&actions=commentCard`
#[derive(Debug, Deserialize)]
pub(crate) struct CardPayload {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    checklists: Vec<RemoteChecklist>,
    #[serde(default)]
    actions: Vec<ActionPayload>,
}

/// Card action; only `commentCard` actions carry comment text
#[derive(Debug, Deserialize)]
pub(crate) struct ActionPayload {
    pub(crate) id: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    data: ActionData,
}

#[derive(Debug, Default, Deserialize)]
struct ActionData {
    #[serde(default)]
    text: Option<String>,
}

/// Action type of a card comment
pub(crate) const COMMENT_ACTION: &str = "commentCard";

impl ActionPayload {
    pub(crate) fn into_comment(self) -> Option<RemoteComment> {
        if self.kind != COMMENT_ACTION {
            return None;
        }
        let text = self.data.text?;
        Some(RemoteComment::new(self.id, text))
    }
}

impl From<CardPayload> for RemoteCard {
    fn from(payload: CardPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name,
            checklists: payload.checklists,
            comments: payload
                .actions
                .into_iter()
                .filter_map(ActionPayload::into_comment)
                .collect(),
        }
    }
}
