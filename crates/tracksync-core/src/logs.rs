//! Daily log → comment reconciliation
//!
//! A comment belongs to the log date in its leading `### YYYY-MM-DD` heading.
//! Missing dates get a new comment, changed text is rewritten in place.
//! Comments are never deleted.

use crate::outcome::{Operation, PassOutcome};
use chrono::NaiveDate;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use tracksync_remote::{BoardClient, RemoteCard, RemoteComment};

/// Bring the card's dated comments in line with the parsed daily logs
///
/// Dates are processed oldest first. Text is compared after trimming, so
/// trailing whitespace alone never causes a write.
pub async fn reconcile_logs(
    board: &dyn BoardClient,
    card_id: &str,
    card: &RemoteCard,
    logs: &BTreeMap<NaiveDate, String>,
) -> PassOutcome {
    let existing = comments_by_date(&card.comments);
    let mut outcome = PassOutcome::default();

    for (date, text) in logs {
        let Some(comment) = existing.get(date) else {
            match board.create_comment(card_id, text).await {
                Ok(_) => {
                    tracing::info!(card = card_id, %date, "created log comment");
                    outcome.stats.created += 1;
                }
                Err(e) => outcome.record_failure(Operation::CreateComment, date.to_string(), &e),
            }
            continue;
        };

        if comment.text.trim() == text.trim() {
            tracing::debug!(card = card_id, %date, "log comment unchanged");
            outcome.stats.unchanged += 1;
            continue;
        }

        match board.update_comment(&comment.id, text).await {
            Ok(()) => {
                tracing::info!(card = card_id, %date, comment = %comment.id, "updated log comment");
                outcome.stats.updated += 1;
            }
            Err(e) => outcome.record_failure(Operation::UpdateComment, date.to_string(), &e),
        }
    }

    outcome
}

/// First comment per date, in the order the board returned them
fn comments_by_date(comments: &[RemoteComment]) -> HashMap<NaiveDate, &RemoteComment> {
    let mut by_date = HashMap::new();
    for comment in comments {
        let Some(date) = comment.extracted_date else {
            continue;
        };
        match by_date.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(comment);
            }
            Entry::Occupied(_) => {
                tracing::debug!(%date, comment = %comment.id, "ignoring additional comment for date");
            }
        }
    }
    by_date
}
