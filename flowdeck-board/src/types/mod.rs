//! Core types for the board model

mod board;
mod ids;
mod task;

pub use board::{Board, Column};
pub use ids::{ColumnId, ProjectId, TaskId};
pub use task::{Task, TaskPatch};
