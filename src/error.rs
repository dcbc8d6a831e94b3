/// Error types for kanban-store
///
/// Every failure the store can hit ends up here. The plain board operations
/// log these and degrade to empty/absent results; the `try_` variants hand
/// them to the caller.

use thiserror::Error;

/// Main error type for board store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database-related errors (statement failures, constraint violations)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (creating the data directory, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Column does not exist
    #[error("Column not found: {0}")]
    ColumnNotFound(i64),

    /// Item does not exist in the given column
    #[error("Item {item_id} not found in column {column_id}")]
    ItemNotFound { column_id: i64, item_id: i64 },
}

/// Result type alias for board store operations
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// True when the database rejected a write because of a UNIQUE or
    /// FOREIGN KEY constraint (duplicate position, unknown column).
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            StoreError::Database(sqlx::Error::Database(db_err)) => {
                db_err.is_unique_violation() || db_err.is_foreign_key_violation()
            }
            _ => false,
        }
    }

    /// Convert StoreError to a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            e if e.is_constraint_violation() => {
                format!("Position already taken or column missing. Details: {}", e)
            }
            StoreError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            StoreError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            StoreError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            StoreError::ColumnNotFound(id) => {
                format!("Column {} does not exist", id)
            }
            StoreError::ItemNotFound { column_id, item_id } => {
                format!("Item {} does not exist in column {}", item_id, column_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = StoreError::ColumnNotFound(7);
        assert!(err.user_message().contains('7'));

        let err = StoreError::ItemNotFound {
            column_id: 2,
            item_id: 9,
        };
        assert_eq!(err.user_message(), "Item 9 does not exist in column 2");
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::Config("empty database path".to_string());
        let display = format!("{}", err);
        assert!(display.contains("Configuration error"));
    }

    #[test]
    fn test_non_database_errors_are_not_constraint_violations() {
        let err = StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        assert!(!err.is_constraint_violation());
        assert!(!StoreError::ColumnNotFound(1).is_constraint_violation());
    }
}
