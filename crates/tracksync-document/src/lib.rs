//! tracksync Document Layer
//!
//! Turns a progress document (markdown kept in source control) into a
//! structured [`ProgressDocument`].
//!
//! # Document shape
//!
//! ```text
//! ## 🏁 Milestones
//! ### Week 1
//! - [x] Setup env
//! - [ ] Write tests
//!
//! ## 📆 Daily Logs
//! ### 2024-01-05
//! Paired on the parser.
//! ---
//! ```
//!
//! Parsing is pure: no network or disk I/O, and the same input text always
//! yields the same document.
//!
//! # Example
//!
//! ```rust
//! use tracksync_document::{DocumentParser, SectionMarkers};
//!
//! let text = "## 🏁 Milestones\n### Week 1\n- [x] Setup env\n";
//! let doc = DocumentParser::new(SectionMarkers::default()).parse(text);
//! assert_eq!(doc.milestones["Week 1"][0].name, "Setup env");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod heading;
pub mod model;
pub mod parser;

// Re-exports for convenience
pub use heading::{date_heading, format_date_heading};
pub use model::{ProgressDocument, Task};
pub use parser::{DocumentParser, SectionMarkers};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse `content` with the default section markers
#[inline]
#[must_use]
pub fn parse_document(content: &str) -> ProgressDocument {
    DocumentParser::new(SectionMarkers::default()).parse(content)
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn parse_document_uses_default_markers() {
        let text = "## 🏁 Milestones\n### M\n- [ ] a\n## 📆 Daily Logs\n### 2024-01-05\nhi\n---\n";
        let doc = parse_document(text);
        assert_eq!(doc.milestones.len(), 1);
        assert_eq!(doc.daily_logs.len(), 1);
    }
}
