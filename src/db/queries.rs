/// Board, column and item queries
///
/// Every operation comes in two flavours. The `try_` functions return the
/// underlying error. The plain ones log it and hand back an empty or absent
/// result, so a failed write shows up as `None` on the read-back.

use crate::config::BOARD_TITLE;
use crate::db::models::*;
use crate::db::BoardStore;
use crate::error::{Result, StoreError};

const SELECT_COLUMNS_WITH_ITEMS: &str = r#"
    SELECT c.id AS column_id, c.name AS column_name, c.position AS column_position,
           i.id AS item_id, i.title AS item_title, i.position AS item_position, i.date AS item_date
    FROM "column" c
    LEFT JOIN item i ON i.column_id = c.id
"#;

const SELECT_ITEMS: &str = "SELECT id, title, position, date, column_id FROM item";

// Log a failed operation and drop the error
fn or_log<T>(operation: &'static str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(operation, error = %e, "SQL error");
            None
        }
    }
}

impl BoardStore {
    /// Load the board: every column with its items, in position order
    pub async fn try_get_board(&self) -> Result<Board> {
        let columns = self.try_get_columns().await?;
        Ok(Board::new(BOARD_TITLE, columns))
    }

    /// Load the board. Never fails; on a database error the board comes
    /// back without columns.
    pub async fn get_board(&self) -> Board {
        Board::new(BOARD_TITLE, self.get_columns().await)
    }

    /// All columns with their items, ordered by column then item position
    pub async fn try_get_columns(&self) -> Result<Vec<Column>> {
        let rows = sqlx::query_as::<_, ColumnItemRow>(&format!(
            "{} ORDER BY c.position, i.position",
            SELECT_COLUMNS_WITH_ITEMS
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(group_columns(rows))
    }

    pub async fn get_columns(&self) -> Vec<Column> {
        or_log("get_columns", self.try_get_columns().await).unwrap_or_default()
    }

    /// A single column with its items
    ///
    /// # Returns
    /// * `Ok(Some(Column))` - Exactly one column matched
    /// * `Ok(None)` - No such column
    pub async fn try_get_column(&self, id: i64) -> Result<Option<Column>> {
        let rows = sqlx::query_as::<_, ColumnItemRow>(&format!(
            "{} WHERE c.id = ? ORDER BY c.position, i.position",
            SELECT_COLUMNS_WITH_ITEMS
        ))
        .bind(id)
        .fetch_all(self.pool())
        .await?;

        let mut columns = group_columns(rows);
        if columns.len() == 1 {
            Ok(columns.pop())
        } else {
            Ok(None)
        }
    }

    pub async fn get_column(&self, id: i64) -> Option<Column> {
        or_log("get_column", self.try_get_column(id).await).flatten()
    }

    /// Insert a column
    ///
    /// # Arguments
    /// * `name` - Display name
    /// * `position` - Left-to-right slot, must not be taken by another column
    ///
    /// # Returns
    /// * `Ok(Column)` - The new column (no items yet)
    /// * `Err(StoreError)` - If the insert failed, e.g. the position is taken
    pub async fn try_post_column(&self, name: &str, position: i64) -> Result<Column> {
        let (id,): (i64,) = sqlx::query_as(
            r#"INSERT INTO "column" (name, position) VALUES (?, ?) RETURNING id"#,
        )
        .bind(name)
        .bind(position)
        .fetch_one(self.pool())
        .await?;

        tracing::debug!(column_id = id, position, "Column created");

        Ok(Column::new(id, name, position))
    }

    pub async fn post_column(&self, name: &str, position: i64) -> Option<Column> {
        or_log("post_column", self.try_post_column(name, position).await)
    }

    /// Replace name and position of a column, then read it back
    pub async fn try_put_column(
        &self,
        id: i64,
        name: &str,
        position: i64,
    ) -> Result<Option<Column>> {
        sqlx::query(r#"UPDATE "column" SET name = ?, position = ? WHERE id = ?"#)
            .bind(name)
            .bind(position)
            .bind(id)
            .execute(self.pool())
            .await?;

        self.try_get_column(id).await
    }

    /// Replace name and position of a column. Returns the column as stored
    /// afterwards: unchanged if the update was rejected, `None` if the id is
    /// unknown.
    pub async fn put_column(&self, id: i64, name: &str, position: i64) -> Option<Column> {
        match self.try_put_column(id, name, position).await {
            Ok(column) => column,
            Err(e) => {
                tracing::error!(operation = "put_column", column_id = id, error = %e, "SQL error");
                self.get_column(id).await
            }
        }
    }

    /// Delete a column and every item in it
    pub async fn try_delete_column(&self, id: i64) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        let items = sqlx::query("DELETE FROM item WHERE column_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(r#"DELETE FROM "column" WHERE id = ?"#)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            column_id = id,
            items_removed = items.rows_affected(),
            "Column deleted"
        );

        Ok(())
    }

    pub async fn delete_column(&self, id: i64) {
        or_log("delete_column", self.try_delete_column(id).await);
    }

    /// Items of a column, top to bottom
    pub async fn try_get_items(&self, column_id: i64) -> Result<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "{} WHERE column_id = ? ORDER BY position",
            SELECT_ITEMS
        ))
        .bind(column_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(Item::from)
            .filter(|item| is_valid(item.id))
            .collect())
    }

    pub async fn get_items(&self, column_id: i64) -> Vec<Item> {
        or_log("get_items", self.try_get_items(column_id).await).unwrap_or_default()
    }

    /// A single item, scoped to its column
    pub async fn try_get_item(&self, column_id: i64, item_id: i64) -> Result<Option<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "{} WHERE column_id = ? AND id = ? ORDER BY position",
            SELECT_ITEMS
        ))
        .bind(column_id)
        .bind(item_id)
        .fetch_all(self.pool())
        .await?;

        let mut items: Vec<Item> = rows
            .into_iter()
            .map(Item::from)
            .filter(|item| is_valid(item.id))
            .collect();

        if items.len() == 1 {
            Ok(items.pop())
        } else {
            Ok(None)
        }
    }

    pub async fn get_item(&self, column_id: i64, item_id: i64) -> Option<Item> {
        or_log("get_item", self.try_get_item(column_id, item_id).await).flatten()
    }

    /// Insert an item stamped with the current time, then read it back
    ///
    /// # Returns
    /// * `Ok(Some(Item))` - The stored item
    /// * `Err(StoreError)` - If the insert failed (position taken in that
    ///   column, or the column doesn't exist)
    pub async fn try_post_item(
        &self,
        column_id: i64,
        title: &str,
        position: i64,
    ) -> Result<Option<Item>> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO item (title, date, position, column_id)
            VALUES (?, datetime('now'), ?, ?)
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(position)
        .bind(column_id)
        .fetch_one(self.pool())
        .await?;

        tracing::debug!(column_id, item_id = id, position, "Item created");

        self.try_get_item(column_id, id).await
    }

    pub async fn post_item(&self, column_id: i64, title: &str, position: i64) -> Option<Item> {
        or_log("post_item", self.try_post_item(column_id, title, position).await).flatten()
    }

    /// Replace title and position of an item, then read it back
    pub async fn try_put_item(
        &self,
        column_id: i64,
        item_id: i64,
        title: &str,
        position: i64,
    ) -> Result<Option<Item>> {
        sqlx::query("UPDATE item SET title = ?, position = ? WHERE column_id = ? AND id = ?")
            .bind(title)
            .bind(position)
            .bind(column_id)
            .bind(item_id)
            .execute(self.pool())
            .await?;

        self.try_get_item(column_id, item_id).await
    }

    /// Replace title and position of an item. Returns the item as stored
    /// afterwards: unchanged if the update was rejected, `None` if there is
    /// no such item in that column.
    pub async fn put_item(
        &self,
        column_id: i64,
        item_id: i64,
        title: &str,
        position: i64,
    ) -> Option<Item> {
        match self.try_put_item(column_id, item_id, title, position).await {
            Ok(item) => item,
            Err(e) => {
                tracing::error!(operation = "put_item", column_id, item_id, error = %e, "SQL error");
                self.get_item(column_id, item_id).await
            }
        }
    }

    pub async fn try_delete_item(&self, column_id: i64, item_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM item WHERE column_id = ? AND id = ?")
            .bind(column_id)
            .bind(item_id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    pub async fn delete_item(&self, column_id: i64, item_id: i64) {
        or_log("delete_item", self.try_delete_item(column_id, item_id).await);
    }

    /// Fill an empty board with a few columns and items to click around in.
    ///
    /// Fails (and inserts nothing) if any of the demo positions are taken.
    pub async fn seed_demo_data(&self) -> Result<()> {
        tracing::info!("Creating demo data");

        let mut tx = self.pool().begin().await?;

        let mut column_ids = Vec::new();
        for (name, position) in [("prepare", 1), ("running", 2), ("finished", 3)] {
            let (id,): (i64,) = sqlx::query_as(
                r#"INSERT INTO "column" (name, position) VALUES (?, ?) RETURNING id"#,
            )
            .bind(name)
            .bind(position)
            .fetch_one(&mut *tx)
            .await?;
            column_ids.push(id);
        }

        let items = [
            ("in plan", 1, column_ids[0]),
            ("some running task", 1, column_ids[1]),
            ("finished task 1", 1, column_ids[2]),
            ("finished task 2", 2, column_ids[2]),
        ];
        for (title, position, column_id) in items {
            sqlx::query(
                "INSERT INTO item (title, date, position, column_id) VALUES (?, datetime('now'), ?, ?)",
            )
            .bind(title)
            .bind(position)
            .bind(column_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Like `try_get_column`, but a missing column is an error
    pub async fn require_column(&self, id: i64) -> Result<Column> {
        self.try_get_column(id)
            .await?
            .ok_or(StoreError::ColumnNotFound(id))
    }

    /// Like `try_get_item`, but a missing item is an error
    pub async fn require_item(&self, column_id: i64, item_id: i64) -> Result<Item> {
        self.try_get_item(column_id, item_id)
            .await?
            .ok_or(StoreError::ItemNotFound { column_id, item_id })
    }
}
