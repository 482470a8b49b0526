use crate::config::{ConfigError, ConfigManager};
use crate::models::{filter_items, State, TodoItem};
use crate::storage::{Storable, StorageError, TodoStorage};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "Keep a todo list in a local key-value store")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "TODO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(flatten)]
    Item(ItemCommand),
    /// Inspect or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    /// List items, optionally filtered by state
    List {
        #[arg(long, default_value = "all")]
        state: State,
    },
    /// Add a new working item
    Add {
        name: String,
        /// RFC 3339 timestamp or YYYY-MM-DD (defaults to one day from now)
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long, default_value = "medium")]
        priority: String,
    },
    /// Mark an item as done
    Done { id: usize },
    /// Mark a done item as working again
    Reopen { id: usize },
    /// Toggle the selection flag of an item
    Select { id: usize },
    /// Remove an item
    Remove { id: usize },
    /// Remove every done item
    ClearDone,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    Get { key: String },
    Set { key: String, value: String },
    Unset { key: String },
    List,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("No item with id {0}")]
    ItemNotFound(usize),
    #[error("Invalid deadline: {0}")]
    InvalidDeadline(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn parse_deadline(input: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CliError::InvalidDeadline(input.to_string()))
}

fn format_item(item: &TodoItem) -> String {
    format!(
        "{}{}\t[{}]\t{}\t{}\t{}",
        if item.select { "*" } else { "" },
        item.id,
        if item.is_done() { "x" } else { " " },
        item.name,
        item.priority,
        item.deadline.to_rfc3339(),
    )
}

fn update_item<S: Storable>(
    storage: &TodoStorage<S>,
    id: usize,
    f: impl FnOnce(&mut TodoItem),
) -> Result<TodoItem, CliError> {
    let mut items = storage.fetch_all()?;
    let item = items.get_mut(id).ok_or(CliError::ItemNotFound(id))?;
    f(item);
    let updated = item.clone();
    storage.save(&items)?;
    Ok(updated)
}

/// Runs one item command against `storage`, writing user output to `out`.
pub fn run_item_command<S: Storable>(
    storage: &TodoStorage<S>,
    command: ItemCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        ItemCommand::List { state } => {
            let items = storage.fetch_all()?;
            for item in filter_items(&items, state) {
                writeln!(out, "{}", format_item(item))?;
            }
        }
        ItemCommand::Add {
            name,
            deadline,
            priority,
        } => {
            let deadline = match deadline {
                Some(d) => parse_deadline(&d)?,
                None => Utc::now() + Duration::days(1),
            };
            let mut items = storage.fetch_all()?;
            let mut item = TodoItem::new(name, deadline, priority);
            item.id = storage.next_id()?;
            items.push(item);
            storage.save(&items)?;
            let position = items.len() - 1;
            info!(id = position, "added item");
            writeln!(out, "Added item {}: {}", position, items[position].name)?;
        }
        ItemCommand::Done { id } => {
            let item = update_item(storage, id, TodoItem::mark_done)?;
            info!(id, "marked item done");
            writeln!(out, "Done: {}", item.name)?;
        }
        ItemCommand::Reopen { id } => {
            let item = update_item(storage, id, TodoItem::mark_working)?;
            info!(id, "reopened item");
            writeln!(out, "Working: {}", item.name)?;
        }
        ItemCommand::Select { id } => {
            let item = update_item(storage, id, TodoItem::toggle_select)?;
            writeln!(
                out,
                "{}: {}",
                if item.select { "Selected" } else { "Deselected" },
                item.name
            )?;
        }
        ItemCommand::Remove { id } => {
            let mut items = storage.fetch_all()?;
            if id >= items.len() {
                return Err(CliError::ItemNotFound(id));
            }
            let removed = items.remove(id);
            storage.save(&items)?;
            info!(id, "removed item");
            writeln!(out, "Removed: {}", removed.name)?;
        }
        ItemCommand::ClearDone => {
            let mut items = storage.fetch_all()?;
            let before = items.len();
            items.retain(|item| !item.is_done());
            storage.save(&items)?;
            let removed = before - items.len();
            info!(removed, "cleared done items");
            writeln!(out, "Removed {} done item(s)", removed)?;
        }
    }
    Ok(())
}

pub fn run_config_command(
    manager: &mut ConfigManager,
    action: ConfigAction,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match action {
        ConfigAction::Get { key } => writeln!(out, "{}", manager.get(&key)?)?,
        ConfigAction::Set { key, value } => {
            manager.set(&key, &value)?;
            writeln!(out, "Set {} = {}", key, manager.get(&key)?)?;
        }
        ConfigAction::Unset { key } => {
            manager.unset(&key)?;
            writeln!(out, "Unset {}", key)?;
        }
        ConfigAction::List => {
            writeln!(out, "# {}", manager.path().display())?;
            for (key, value, is_default) in manager.list()? {
                let marker = if is_default { " (default)" } else { "" };
                writeln!(out, "{} = {}{}", key, value, marker)?;
            }
        }
    }
    Ok(())
}

pub fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    match cli.command {
        Command::Config { action } => {
            let mut manager = ConfigManager::new(cli.config.as_deref())?;
            run_config_command(&mut manager, action, out)
        }
        Command::Item(command) => {
            let storage = TodoStorage::from_config(cli.config.as_deref())?;
            run_item_command(&storage, command, out)
        }
    }
}
