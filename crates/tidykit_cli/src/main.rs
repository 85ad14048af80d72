//! Command-line probe over a SQLite-backed to-do list.
//!
//! # Responsibility
//! - Exercise `tidykit_core` wiring end to end without a UI.
//! - Keep output line-oriented and stable for scripting.

use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use tidykit_core::{
    core_version, default_log_level, init_logging, ping, SortOption, SqliteKeyValueStore,
    TodoError, TodoId, TodoItem, TodoService,
};

#[derive(Debug, Parser)]
#[command(name = "tidykit", version, about = "tidykit to-do list probe")]
struct Cli {
    /// SQLite database holding the key-value entries.
    #[arg(long, default_value = "tidykit.db")]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,

    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core health and version.
    Ping,
    /// Add a to-do.
    Add { title: String },
    /// List to-dos, optionally filtered and sorted.
    List {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value_t = SortOption::Date)]
        sort: SortOption,
    },
    /// Flip completion of a to-do.
    Toggle { id: TodoId },
    /// Delete a to-do.
    Delete { id: TodoId },
    /// Replace a to-do's title.
    Rename { id: TodoId, title: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Command::Ping = cli.command {
        println!("tidykit_core ping={}", ping());
        println!("tidykit_core version={}", core_version());
        return Ok(());
    }

    let store = SqliteKeyValueStore::open(&cli.db).map_err(|err| err.to_string())?;
    let mut todos = TodoService::new(store);
    if let Some(message) = todos.error_message() {
        return Err(message.to_string());
    }

    match cli.command {
        Command::Ping => {}
        Command::Add { title } => {
            let title = title.trim();
            if title.is_empty() {
                return Err("title must not be blank".to_string());
            }
            let item = TodoItem::new(title);
            let id = item.id;
            todos.add_todo(item).map_err(message)?;
            println!("{id}");
        }
        Command::List { query, sort } => {
            todos.set_query(query);
            todos.set_sort_option(sort);
            for item in todos.visible_items() {
                let mark = if item.is_completed { "x" } else { " " };
                println!(
                    "[{mark}] {} {} {}",
                    item.id,
                    item.date.format("%Y-%m-%d"),
                    item.title
                );
            }
        }
        Command::Toggle { id } => {
            require(&todos, id)?;
            todos.toggle_todo(id).map_err(message)?;
        }
        Command::Delete { id } => {
            require(&todos, id)?;
            todos.delete_todo(id).map_err(message)?;
        }
        Command::Rename { id, title } => {
            let mut item = require(&todos, id)?.clone();
            item.title = title.trim().to_string();
            todos.update_todo(item).map_err(message)?;
        }
    }
    Ok(())
}

fn require(todos: &TodoService<SqliteKeyValueStore>, id: TodoId) -> Result<&TodoItem, String> {
    todos.get(id).ok_or_else(|| format!("no to-do with id {id}"))
}

fn message(err: TodoError) -> String {
    err.message().to_string()
}
