//! tracksync Remote Layer
//!
//! Adapters for the two external systems a sync touches:
//! - [`DocumentSource`]: reads progress documents ([`GitHubSource`])
//! - [`BoardClient`]: reads card snapshots and writes checklists, items and
//!   comments ([`TrelloClient`])
//!
//! Both are traits so reconciliation can run against in-memory fakes.
//!
//! # Example
//!
//! ```rust,ignore
//! use tracksync_remote::{BoardClient, TrelloClient, DEFAULT_TRELLO_API_URL};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let board = TrelloClient::new(DEFAULT_TRELLO_API_URL, "key", "token")?;
//! let card = board.fetch_card("5f1c...").await?;
//! println!("{} checklists", card.checklists.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod board;
pub mod error;
pub mod github;
pub mod http;
pub mod model;
pub mod source;
pub mod trello;

// Re-exports for convenience
pub use board::BoardClient;
pub use error::RemoteError;
pub use github::{GitHubSource, DEFAULT_GITHUB_API_URL};
pub use model::{ItemState, RemoteCard, RemoteChecklist, RemoteComment, RemoteItem};
pub use source::DocumentSource;
pub use trello::{TrelloClient, DEFAULT_TRELLO_API_URL};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
