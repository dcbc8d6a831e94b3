/// Board store connection management
///
/// The store owns a single SQLite connection for its whole lifetime.

use crate::config::{DATABASE_FILE, MAX_CONNECTIONS};
use crate::db::models::BoardStats;
use crate::error::{Result, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::{Path, PathBuf};

/// Board store backed by a single SQLite connection
pub struct BoardStore {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl BoardStore {
    /// Open (or create) the board database at `db_path`
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    ///
    /// # Returns
    /// * `Ok(BoardStore)` - Store with the schema in place
    /// * `Err(StoreError)` - If the directory, file, or schema can't be set up
    ///
    /// # Examples
    /// ```no_run
    /// use kanban_store_lib::db::BoardStore;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let store = BoardStore::new("./data/kanban-board.db").await?;
    /// let board = store.get_board().await;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if db_path.as_os_str().is_empty() {
            return Err(StoreError::Config("empty database path".to_string()));
        }

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                tracing::info!(dir = %parent.display(), "Creating database directory");
                std::fs::create_dir_all(parent)?;
            }
        }

        // Plain filename, not a URL: '?' and '#' are legal in file names
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let store = Self { pool, db_path };
        store.initialize_schema().await?;

        tracing::debug!(path = %store.db_path.display(), "Board store opened");

        Ok(store)
    }

    /// Open the database at the path compiled into this build
    pub async fn open_default() -> Result<Self> {
        Self::new(DATABASE_FILE).await
    }

    /// Create a test store in memory
    ///
    /// Fresh, empty database for each call.
    #[cfg(test)]
    pub async fn new_test() -> Result<Self> {
        let options =
            <SqliteConnectOptions as std::str::FromStr>::from_str("sqlite::memory:")?
                .foreign_keys(true);

        // One connection, otherwise every pooled connection gets its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let store = Self {
            pool,
            db_path: PathBuf::from(":memory:"),
        };

        store.initialize_schema().await?;

        Ok(store)
    }

    /// Create the `column` and `item` tables if they don't exist
    async fn initialize_schema(&self) -> Result<()> {
        let schema = include_str!("schema.sql");
        sqlx::raw_sql(schema).execute(&self.pool).await?;

        Ok(())
    }

    /// Get reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Close the connection
    ///
    /// Should be called on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Row counts for the status report
    pub async fn stats(&self) -> Result<BoardStats> {
        let column_count: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM "column""#)
            .fetch_one(&self.pool)
            .await?;

        let item_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM item")
            .fetch_one(&self.pool)
            .await?;

        Ok(BoardStats {
            total_columns: column_count.0,
            total_items: item_count.0,
            pool_size: self.pool.size(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_creation() {
        let store = BoardStore::new_test().await;
        assert!(store.is_ok());
    }

    #[tokio::test]
    async fn test_store_stats_empty() {
        let store = BoardStore::new_test().await.unwrap();
        let stats = store.stats().await.unwrap();

        assert_eq!(stats.total_columns, 0);
        assert_eq!(stats.total_items, 0);
        assert_eq!(stats.pool_size, 1);
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let store = BoardStore::new_test().await.unwrap();

        let (enabled,): (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("nested").join("data").join("kanban-board.db");

        let store = BoardStore::new(&db_path).await.unwrap();
        assert!(db_path.parent().unwrap().is_dir());
        assert!(db_path.exists());
        assert_eq!(store.path(), db_path.as_path());

        store.close().await;
    }

    #[tokio::test]
    async fn test_path_with_url_characters() {
        let temp = TempDir::new().unwrap();

        for name in ["board?v=2.db", "100%done.db", "a#b.db"] {
            let db_path = temp.path().join(name);
            let store = BoardStore::new(&db_path).await.unwrap();
            store.post_column("prepare", 1).await.unwrap();
            store.close().await;

            assert!(db_path.exists(), "{} was not created", name);
        }
    }

    #[tokio::test]
    async fn test_empty_path_rejected() {
        let result = BoardStore::new("").await;
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("kanban-board.db");

        let first = BoardStore::new(&db_path).await.unwrap();
        first.post_column("prepare", 1).await.unwrap();
        first.close().await;

        // Reopening must keep existing rows
        let second = BoardStore::new(&db_path).await.unwrap();
        assert_eq!(second.get_columns().await.len(), 1);
    }

    #[tokio::test]
    async fn test_schema_tables_exist() {
        let store = BoardStore::new_test().await.unwrap();

        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('column', 'item')",
        )
        .fetch_one(store.pool())
        .await
        .unwrap();
        assert_eq!(count, 2);
    }
}
