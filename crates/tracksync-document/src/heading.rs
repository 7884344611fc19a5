//! Line classifiers shared by the parser and the remote comment matcher
//!
//! Every function here operates on a single, already trimmed line.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^###\s*(.+)").expect("valid heading regex"));
static DATE_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^###\s*(\d{4}-\d{2}-\d{2})").expect("valid date heading regex"));
static CHECKBOX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-\s*\[(x| )\]\s*(.+)").expect("valid checkbox regex"));

/// Title of a level-3 heading (`### Week 1` → `Week 1`)
#[must_use]
pub fn level3_title(line: &str) -> Option<&str> {
    HEADING_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|title| !title.is_empty())
}

/// Date named by a level-3 date heading (`### 2024-01-05` → 2024-01-05)
///
/// Text after the date is allowed (`### 2024-01-05 (Fri)`). Returns `None`
/// when the line is not a date heading or the digits are not a calendar date.
#[must_use]
pub fn date_heading(line: &str) -> Option<NaiveDate> {
    let raw = DATE_HEADING_RE.captures(line)?.get(1)?.as_str();
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::debug!(heading = line, "ignoring heading with invalid date");
            None
        }
    }
}

/// Canonical heading line for a log date
#[inline]
#[must_use]
pub fn format_date_heading(date: NaiveDate) -> String {
    format!("### {}", date.format("%Y-%m-%d"))
}

/// Checkbox list item (`- [x] text`) as `(checked, text)`
#[must_use]
pub fn checkbox(line: &str) -> Option<(bool, &str)> {
    let caps = CHECKBOX_RE.captures(line)?;
    let checked = caps.get(1)?.as_str() == "x";
    let text = caps.get(2)?.as_str().trim();
    Some((checked, text))
}

/// Horizontal rule delimiting a log entry (`---`, `-----`)
#[inline]
#[must_use]
pub fn is_delimiter(line: &str) -> bool {
    line.len() >= 3 && line.bytes().all(|b| b == b'-')
}
