//! Progress document parser
//!
//! Scans the document line by line. Two fixed level-2 headings switch between
//! the milestones section and the daily-logs section:
//! - Milestones: `### Name` opens a milestone, `- [x] text` / `- [ ] text`
//!   appends a task to the open milestone.
//! - Daily logs: `### YYYY-MM-DD` starts an entry that runs until the next
//!   horizontal rule, date heading, or level-1/2 heading.
//!
//! Log entries are sliced by line index, so the same date text appearing
//! elsewhere in the document never changes which lines belong to an entry.

use crate::heading;
use crate::model::{ProgressDocument, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default heading that opens the milestones section
pub const DEFAULT_MILESTONES_MARKER: &str = "## 🏁 Milestones";

/// Default heading that opens the daily-logs section
pub const DEFAULT_DAILY_LOGS_MARKER: &str = "## 📆 Daily Logs";

/// Headings that switch the parser between document sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionMarkers {
    /// Line that opens the milestones section
    pub milestones: String,
    /// Line that opens the daily-logs section
    pub daily_logs: String,
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self {
            milestones: DEFAULT_MILESTONES_MARKER.to_string(),
            daily_logs: DEFAULT_DAILY_LOGS_MARKER.to_string(),
        }
    }
}

impl SectionMarkers {
    /// Create markers from custom heading lines
    #[inline]
    #[must_use]
    pub fn new(milestones: impl Into<String>, daily_logs: impl Into<String>) -> Self {
        Self {
            milestones: milestones.into(),
            daily_logs: daily_logs.into(),
        }
    }

    fn section_of(&self, line: &str) -> Option<Section> {
        if line == self.milestones.trim() {
            Some(Section::Milestones)
        } else if line == self.daily_logs.trim() {
            Some(Section::DailyLogs)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Milestones,
    DailyLogs,
}

/// Markdown progress document parser
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    markers: SectionMarkers,
}

impl DocumentParser {
    /// Create parser with the given section markers
    #[inline]
    #[must_use]
    pub fn new(markers: SectionMarkers) -> Self {
        Self { markers }
    }

    /// Section markers in use
    #[inline]
    #[must_use]
    pub fn markers(&self) -> &SectionMarkers {
        &self.markers
    }

    /// Parse document text
    ///
    /// Never fails: lines that do not fit the expected shape are ignored.
    #[must_use]
    pub fn parse(&self, content: &str) -> ProgressDocument {
        let raw: Vec<&str> = content.lines().collect();
        let lines: Vec<&str> = raw.iter().copied().map(str::trim).collect();

        let mut doc = ProgressDocument::new();
        let mut section: Option<Section> = None;
        let mut milestone: Option<String> = None;

        for (idx, line) in lines.iter().enumerate() {
            if let Some(next) = self.markers.section_of(line) {
                section = Some(next);
                continue;
            }

            match section {
                Some(Section::Milestones) => {
                    if let Some(title) = heading::level3_title(line) {
                        doc.milestones.insert(title.to_string(), Vec::new());
                        milestone = Some(title.to_string());
                    } else if let Some((checked, text)) = heading::checkbox(line) {
                        match milestone.as_ref().and_then(|m| doc.milestones.get_mut(m)) {
                            Some(tasks) => tasks.push(Task::new(text, checked)),
                            None => tracing::debug!(task = text, "dropping task before any milestone"),
                        }
                    }
                }
                Some(Section::DailyLogs) => {
                    let Some(date) = heading::date_heading(line) else {
                        continue;
                    };
                    if doc.daily_logs.contains_key(&date) {
                        tracing::warn!(%date, line = idx + 1, "duplicate log heading, keeping the first entry");
                        continue;
                    }
                    let body = self.entry_body(&raw, &lines, idx + 1);
                    doc.daily_logs.insert(date, entry_text(date, &body));
                }
                None => {}
            }
        }

        doc
    }

    /// Lines after a date heading, up to the next entry boundary
    ///
    /// Boundaries are found on the trimmed lines; the body is sliced from the
    /// raw lines so indentation inside the entry survives.
    fn entry_body(&self, raw: &[&str], trimmed: &[&str], start: usize) -> String {
        let end = trimmed[start..]
            .iter()
            .position(|line| self.is_entry_boundary(line))
            .map_or(trimmed.len(), |offset| start + offset);
        raw[start..end].join("\n").trim().to_string()
    }

    fn is_entry_boundary(&self, line: &str) -> bool {
        heading::is_delimiter(line)
            || heading::date_heading(line).is_some()
            || self.markers.section_of(line).is_some()
            || is_upper_heading(line)
    }
}

/// Level-1 or level-2 ATX heading
fn is_upper_heading(line: &str) -> bool {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    (1..=2).contains(&hashes) && line[hashes..].starts_with(char::is_whitespace)
}

fn entry_text(date: NaiveDate, body: &str) -> String {
    let heading = heading::format_date_heading(date);
    if body.is_empty() {
        heading
    } else {
        format!("{heading}\n{body}")
    }
}
