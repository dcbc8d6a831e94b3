// kanban-store - look at and edit the kanban board database from a terminal
//
// Parses CLI args and dispatches to handlers. Handy for poking at the data
// the board service writes without going through HTTP.

use anyhow::{bail, Context};
use kanban_store_lib::{config, BoardStore, Column, Item};
use std::env;

// Flags that may appear anywhere on the command line
struct GlobalOptions {
    db_path: Option<String>,
    verbose: bool,
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (options, args) = split_global_options(env::args().skip(1).collect());

    init_logging(options.verbose);

    if args.is_empty() {
        print_usage();
        return Ok(());
    }

    let command = args[0].as_str();
    let rest = &args[1..];

    match command {
        "version" | "-v" | "--version" => {
            println!("kanban-store v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        "help" | "-h" | "--help" => {
            print_usage();
            return Ok(());
        }
        _ => {}
    }

    let store = open_store(&options).await?;

    let result = match command {
        "board" => handle_board(&store, options.json).await,
        "columns" => handle_columns(&store).await,
        "add-column" => handle_add_column(&store, rest).await,
        "rename-column" => handle_rename_column(&store, rest).await,
        "delete-column" => handle_delete_column(&store, rest).await,
        "items" => handle_items(&store, rest).await,
        "add-item" => handle_add_item(&store, rest).await,
        "edit-item" => handle_edit_item(&store, rest).await,
        "delete-item" => handle_delete_item(&store, rest).await,
        "seed" => handle_seed(&store).await,
        "status" => handle_status(&store).await,
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    };

    store.close().await;
    result
}

fn split_global_options(args: Vec<String>) -> (GlobalOptions, Vec<String>) {
    let mut options = GlobalOptions {
        db_path: None,
        verbose: false,
        json: false,
    };
    let mut rest = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" => options.db_path = iter.next(),
            "--verbose" => options.verbose = true,
            "--json" => options.json = true,
            _ => rest.push(arg),
        }
    }

    (options, rest)
}

fn init_logging(verbose: bool) {
    // RUST_LOG wins if set
    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "kanban_store=debug,kanban_store_lib=debug".to_string()
        } else {
            "kanban_store=info,kanban_store_lib=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn open_store(options: &GlobalOptions) -> anyhow::Result<BoardStore> {
    let path = options
        .db_path
        .clone()
        .unwrap_or_else(|| config::DATABASE_FILE.to_string());

    BoardStore::new(&path)
        .await
        .with_context(|| format!("Cannot open database: {}", path))
}

fn parse_id(args: &[String], index: usize, what: &str) -> anyhow::Result<i64> {
    let raw = match args.get(index) {
        Some(raw) => raw,
        None => bail!("Missing {}", what),
    };
    raw.parse::<i64>()
        .with_context(|| format!("Invalid {}: '{}'", what, raw))
}

fn joined_text(args: &[String], from: usize, what: &str) -> anyhow::Result<String> {
    let text = args.get(from..).unwrap_or_default().join(" ");
    if text.trim().is_empty() {
        bail!("Missing {}", what);
    }
    Ok(text)
}

fn print_column(column: &Column) {
    println!(
        "[{}] {} (position {}, {} item(s))",
        column.id,
        column.name,
        column.position,
        column.item_count()
    );
}

fn print_item(item: &Item) {
    println!(
        "    {:>3}. [{}] {}  ({})",
        item.position, item.id, item.title, item.timestamp
    );
}

async fn handle_board(store: &BoardStore, json: bool) -> anyhow::Result<()> {
    let board = store.try_get_board().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }

    println!("\n{}", board.title);
    println!("{}", "=".repeat(60));
    if board.columns.is_empty() {
        println!("No columns yet. Try 'kanban-store seed'.");
    }
    for column in &board.columns {
        print_column(column);
        for item in &column.items {
            print_item(item);
        }
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_columns(store: &BoardStore) -> anyhow::Result<()> {
    let columns = store.try_get_columns().await?;

    if columns.is_empty() {
        println!("No columns found.");
    }
    for column in &columns {
        print_column(column);
    }

    Ok(())
}

async fn handle_add_column(store: &BoardStore, args: &[String]) -> anyhow::Result<()> {
    let name = match args.first() {
        Some(name) => name,
        None => bail!("Missing column name"),
    };
    let position = parse_id(args, 1, "position")?;

    match store.try_post_column(name, position).await {
        Ok(column) => print_column(&column),
        Err(e) => bail!(e.user_message()),
    }

    Ok(())
}

async fn handle_rename_column(store: &BoardStore, args: &[String]) -> anyhow::Result<()> {
    let id = parse_id(args, 0, "column id")?;
    let name = match args.get(1) {
        Some(name) => name,
        None => bail!("Missing column name"),
    };
    let position = parse_id(args, 2, "position")?;

    match store.try_put_column(id, name, position).await {
        Ok(Some(column)) => print_column(&column),
        Ok(None) => bail!("Column {} not found", id),
        Err(e) => bail!(e.user_message()),
    }

    Ok(())
}

async fn handle_delete_column(store: &BoardStore, args: &[String]) -> anyhow::Result<()> {
    let id = parse_id(args, 0, "column id")?;
    let column = store.require_column(id).await?;

    store.try_delete_column(id).await?;
    println!(
        "Deleted column '{}' and {} item(s)",
        column.name,
        column.item_count()
    );

    Ok(())
}

async fn handle_items(store: &BoardStore, args: &[String]) -> anyhow::Result<()> {
    let column_id = parse_id(args, 0, "column id")?;
    let items = store.try_get_items(column_id).await?;

    if items.is_empty() {
        println!("No items in column {}.", column_id);
    }
    for item in &items {
        print_item(item);
    }

    Ok(())
}

async fn handle_add_item(store: &BoardStore, args: &[String]) -> anyhow::Result<()> {
    let column_id = parse_id(args, 0, "column id")?;
    let position = parse_id(args, 1, "position")?;
    let title = joined_text(args, 2, "item title")?;

    match store.try_post_item(column_id, &title, position).await {
        Ok(Some(item)) => print_item(&item),
        Ok(None) => bail!("Item was not stored"),
        Err(e) => bail!(e.user_message()),
    }

    Ok(())
}

async fn handle_edit_item(store: &BoardStore, args: &[String]) -> anyhow::Result<()> {
    let column_id = parse_id(args, 0, "column id")?;
    let item_id = parse_id(args, 1, "item id")?;
    let position = parse_id(args, 2, "position")?;
    let title = joined_text(args, 3, "item title")?;

    match store.try_put_item(column_id, item_id, &title, position).await {
        Ok(Some(item)) => print_item(&item),
        Ok(None) => bail!("Item {} not found in column {}", item_id, column_id),
        Err(e) => bail!(e.user_message()),
    }

    Ok(())
}

async fn handle_delete_item(store: &BoardStore, args: &[String]) -> anyhow::Result<()> {
    let column_id = parse_id(args, 0, "column id")?;
    let item_id = parse_id(args, 1, "item id")?;
    let item = store.require_item(column_id, item_id).await?;

    store.try_delete_item(column_id, item_id).await?;
    println!("Deleted item '{}'", item.title);

    Ok(())
}

async fn handle_seed(store: &BoardStore) -> anyhow::Result<()> {
    store
        .seed_demo_data()
        .await
        .context("Demo data not created (board already has columns at positions 1-3?)")?;

    println!("Demo columns and items created.");
    Ok(())
}

async fn handle_status(store: &BoardStore) -> anyhow::Result<()> {
    let stats = store.stats().await?;

    println!("\nkanban-store Status");
    println!("{}", "=".repeat(60));
    println!("  Database:    {}", store.path().display());
    println!("  Columns:     {}", stats.total_columns);
    println!("  Items:       {}", stats.total_items);
    println!("  Connections: {}", stats.pool_size);
    println!("{}", "=".repeat(60));

    Ok(())
}

fn print_usage() {
    println!(
        r#"kanban-store v{} - Kanban board database tool

USAGE:
    kanban-store [--db <path>] [--verbose] <COMMAND> [ARGS]

COMMANDS:
    board [--json]                                Show the whole board
    columns                                       List columns
    add-column <name> <position>                  Create a column
    rename-column <id> <name> <position>          Update a column
    delete-column <id>                            Delete a column and its items
    items <column>                                List items of a column
    add-item <column> <position> <title...>       Create an item
    edit-item <column> <item> <position> <title...>
                                                  Update an item
    delete-item <column> <item>                   Delete an item
    seed                                          Insert demo columns and items
    status                                        Show database stats
    version                                       Show version
    help                                          Show this help

Default database: {}
"#,
        env!("CARGO_PKG_VERSION"),
        config::DATABASE_FILE
    );
}
