/// kanban-store library
///
/// Persistence layer for a kanban board: ordered columns holding ordered
/// items, stored in SQLite.

pub mod config;
pub mod db;
pub mod error;

// Re-exports for convenience
pub use db::{Board, BoardStore, Column, Item, INVALID_ID};
pub use error::{Result, StoreError};
