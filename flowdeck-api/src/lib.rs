//! Remote sync layer for the Flowdeck kanban client
//!
//! The IO half of the client core. `flowdeck-board` owns the pure model and
//! the reconciliation logic; this crate talks to the REST API:
//!
//! - [`ApiClient`] - reqwest wrapper over the board endpoints, with
//!   bearer-token injection from an injected [`TokenStore`] and local id
//!   validation before dispatch
//! - [`load_board`] - assembles a consistent board from the project, column
//!   and task resources, repairing drift between them
//! - [`sync`] - persists reconciliation deltas (concurrently, fire-and-forget)
//!   and runs the server-confirmed create flows
//!
//! ## Basic usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use flowdeck_api::{load_board, sync, ApiClient, HttpConfig, MemoryTokenStore};
//! use flowdeck_board::{reconcile, DragEnd, ProjectId};
//!
//! # async fn example() -> flowdeck_api::Result<()> {
//! let config = HttpConfig::new("http://localhost:5005/api")?;
//! let client = ApiClient::new(&config, Arc::new(MemoryTokenStore::with_token("token")));
//!
//! let board = load_board(&client, &ProjectId::new("p1")).await?;
//!
//! // The user dragged task t1 from column a to the top of column b
//! let gesture = DragEnd::task("t1", "a", 0, "b", 0);
//! if let Some(outcome) = reconcile::drag_end(&board, &gesture) {
//!     // The new snapshot is shown immediately; persistence trails behind
//!     sync::persist(&client, &board.id, &outcome.deltas).await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod loader;
pub mod sync;
pub mod token;
pub mod wire;

pub use client::{ApiClient, BoardApi};
pub use config::HttpConfig;
pub use error::{ApiError, Result};
pub use loader::load_board;
pub use sync::NewTask;
pub use token::{MemoryTokenStore, TokenStore};
