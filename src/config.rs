/// Compile-time settings for the board store
///
/// The database location is baked in at build time: the deployed service keeps
/// its data next to the binary, a development build one directory up.

/// Default database file for deployed builds
#[cfg(feature = "release-service")]
pub const DATABASE_FILE: &str = "./data/kanban-board.db";

/// Default database file for development builds
#[cfg(not(feature = "release-service"))]
pub const DATABASE_FILE: &str = "../data/kanban-board.db";

/// Title every board is reconstructed with
pub const BOARD_TITLE: &str = "Kanban Board";

/// The store owns exactly one connection for its lifetime
pub const MAX_CONNECTIONS: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_database_file_has_parent_dir() {
        let parent = Path::new(DATABASE_FILE).parent().unwrap();
        assert!(parent.ends_with("data"));
    }

    #[test]
    fn test_single_connection() {
        assert_eq!(MAX_CONNECTIONS, 1);
    }
}
