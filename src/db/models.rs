/// Data models for the kanban board
///
/// Columns and items map to the `column` and `item` tables. The board itself
/// is never stored; it is rebuilt from the columns on every read.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

/// Id carried by anything that is not (or not yet) a persisted row
pub const INVALID_ID: i64 = -1;

/// Format SQLite's `datetime('now')` produces
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether an id refers to a real row
pub fn is_valid(id: i64) -> bool {
    id != INVALID_ID
}

/// The whole board: a title and its columns, left to right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub title: String,
    pub columns: Vec<Column>,
}

impl Board {
    pub fn new(title: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            title: title.into(),
            columns,
        }
    }

    /// Total number of items across all columns
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(Column::item_count).sum()
    }
}

/// A named bucket of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: i64,
    pub name: String,
    pub position: i64,
    pub items: Vec<Item>,
}

impl Column {
    pub fn new(id: i64, name: impl Into<String>, position: i64) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            items: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// A unit of work inside a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub position: i64,
    pub timestamp: String, // "YYYY-MM-DD HH:MM:SS" UTC, set by SQLite on insert
    pub column_id: i64,
}

impl Item {
    /// Parse the creation timestamp. None if it is empty or not in the
    /// format SQLite writes.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }
}

/// One row of the `item` table as selected by the item queries
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ItemRow {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub position: Option<i64>,
    pub date: Option<String>,
    pub column_id: Option<i64>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id.unwrap_or(INVALID_ID),
            title: row.title.unwrap_or_default(),
            position: row.position.unwrap_or_default(),
            timestamp: row.date.unwrap_or_default(),
            column_id: row.column_id.unwrap_or(INVALID_ID),
        }
    }
}

/// One row of the column/item left join. Item fields are all NULL for a
/// column without items.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ColumnItemRow {
    pub column_id: Option<i64>,
    pub column_name: Option<String>,
    pub column_position: Option<i64>,
    pub item_id: Option<i64>,
    pub item_title: Option<String>,
    pub item_position: Option<i64>,
    pub item_date: Option<String>,
}

impl ColumnItemRow {
    fn column(&self) -> Column {
        Column::new(
            self.column_id.unwrap_or(INVALID_ID),
            self.column_name.clone().unwrap_or_default(),
            self.column_position.unwrap_or_default(),
        )
    }

    fn item(&self) -> Item {
        Item {
            id: self.item_id.unwrap_or(INVALID_ID),
            title: self.item_title.clone().unwrap_or_default(),
            position: self.item_position.unwrap_or_default(),
            timestamp: self.item_date.clone().unwrap_or_default(),
            column_id: self.column_id.unwrap_or(INVALID_ID),
        }
    }
}

/// Fold join rows into columns.
///
/// Rows sharing a column id land in the same column, items in row order.
/// Null item halves (columns without items) and rows without a valid column
/// id are skipped. The result is ordered by column position.
pub(crate) fn group_columns(rows: Vec<ColumnItemRow>) -> Vec<Column> {
    let mut columns: Vec<Column> = Vec::new();
    let mut index_by_id: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let column_id = row.column_id.unwrap_or(INVALID_ID);
        if !is_valid(column_id) {
            continue;
        }

        let idx = *index_by_id.entry(column_id).or_insert_with(|| {
            columns.push(row.column());
            columns.len() - 1
        });

        let item = row.item();
        if is_valid(item.id) {
            columns[idx].add_item(item);
        }
    }

    columns.sort_by_key(|c| c.position);
    columns
}

/// Counts reported by `BoardStore::stats`
#[derive(Debug, Clone)]
pub struct BoardStats {
    pub total_columns: i64,
    pub total_items: i64,
    pub pool_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        column: (i64, &str, i64),
        item: Option<(i64, &str, i64)>,
    ) -> ColumnItemRow {
        ColumnItemRow {
            column_id: Some(column.0),
            column_name: Some(column.1.to_string()),
            column_position: Some(column.2),
            item_id: item.map(|i| i.0),
            item_title: item.map(|i| i.1.to_string()),
            item_position: item.map(|i| i.2),
            item_date: item.map(|_| "2025-11-25 10:00:00".to_string()),
        }
    }

    #[test]
    fn test_group_merges_rows_of_same_column() {
        let rows = vec![
            row((1, "todo", 1), Some((10, "a", 1))),
            row((1, "todo", 1), Some((11, "b", 2))),
            row((2, "done", 2), Some((12, "c", 1))),
        ];

        let columns = group_columns(rows);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].items.len(), 2);
        assert_eq!(columns[0].items[1].title, "b");
        assert_eq!(columns[1].items[0].column_id, 2);
    }

    #[test]
    fn test_group_keeps_empty_columns() {
        let rows = vec![row((3, "empty", 1), None)];

        let columns = group_columns(rows);
        assert_eq!(columns.len(), 1);
        assert!(columns[0].items.is_empty());
    }

    #[test]
    fn test_group_orders_by_position() {
        let rows = vec![row((5, "later", 9), None), row((6, "first", 2), None)];

        let columns = group_columns(rows);
        assert_eq!(columns[0].name, "first");
        assert_eq!(columns[1].name, "later");
    }

    #[test]
    fn test_group_skips_rows_without_column_id() {
        let mut orphan = row((1, "x", 1), None);
        orphan.column_id = None;

        assert!(group_columns(vec![orphan]).is_empty());
    }

    #[test]
    fn test_null_fields_default() {
        let item: Item = ItemRow {
            id: None,
            title: None,
            position: None,
            date: None,
            column_id: None,
        }
        .into();

        assert_eq!(item.id, INVALID_ID);
        assert_eq!(item.title, "");
        assert_eq!(item.position, 0);
        assert!(!is_valid(item.column_id));
    }

    #[test]
    fn test_item_created_at() {
        let mut item = Item {
            id: 1,
            title: "write docs".to_string(),
            position: 1,
            timestamp: "2025-11-25 08:30:00".to_string(),
            column_id: 1,
        };
        assert!(item.created_at().is_some());

        item.timestamp.clear();
        assert!(item.created_at().is_none());
    }

    #[test]
    fn test_board_item_count() {
        let mut todo = Column::new(1, "todo", 1);
        todo.add_item(Item {
            id: 1,
            title: "a".to_string(),
            position: 1,
            timestamp: String::new(),
            column_id: 1,
        });
        let board = Board::new("b", vec![todo, Column::new(2, "done", 2)]);

        assert_eq!(board.item_count(), 1);
    }
}
