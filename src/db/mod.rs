/// Database module for kanban-store
///
/// Owns the SQLite connection, the schema, and the board CRUD queries.
/// Built on sqlx.

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::BoardStore;
pub use models::*;
