//! Client-side kanban board model and reconciliation engine
//!
//! This crate is the pure half of the Flowdeck client core: the in-memory
//! representation of a project's board (columns, ordered task lists, task
//! details) and the reconciliation logic that turns user gestures into new
//! immutable snapshots plus the deltas a sync layer must persist.
//!
//! Nothing here performs IO. The companion `flowdeck-api` crate owns the REST
//! client, the sync adapter and the board loader.
//!
//! ## Overview
//!
//! - **One board = one project** - columns, tasks and an explicit column order
//! - **Immutable snapshots** - every mutation produces a new [`Board`]; the
//!   previous snapshot stays valid for diffing or rollback
//! - **Closed operation set** - all mutations are [`BoardOp`] variants applied
//!   by [`reduce::apply`], so the ordering invariants can be property-tested
//!   without any UI in the loop
//! - **Gesture in, deltas out** - [`reconcile::drag_end`] consumes the
//!   abstract result of a drag and names exactly what must be persisted
//!
//! ## Basic usage
//!
//! ```rust
//! use flowdeck_board::{reconcile, Board, Column, DragEnd};
//!
//! let mut board = Board::new("p1", "Roadmap");
//! board.column_order = vec!["todo".into(), "doing".into()];
//! board.columns.insert("todo".into(), Column::new("todo", "To Do"));
//! board.columns.insert("doing".into(), Column::new("doing", "Doing"));
//!
//! // The user dragged the "doing" column to the leftmost slot
//! let gesture = DragEnd::column("doing", 1, 0);
//! let outcome = reconcile::drag_end(&board, &gesture).expect("valid gesture");
//!
//! assert_eq!(outcome.board.column_order[0].as_str(), "doing");
//! assert_eq!(outcome.deltas.len(), 1); // the full new column order
//! ```

mod error;
pub mod op;
pub mod reconcile;
pub mod reduce;
pub mod types;

pub use error::InvariantViolation;
pub use op::BoardOp;
pub use reconcile::{
    DragEnd, DragKind, DropSlot, PersistDelta, Reconciliation, BOARD_CONTAINER,
};
pub use types::{Board, Column, ColumnId, ProjectId, Task, TaskId, TaskPatch};
