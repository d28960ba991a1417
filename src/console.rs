//! Line commands for the terminal front-end.
//!
//! Parsing and rendering live here so the binary only does I/O.

use crate::features::history::HistoryEntry;
use crate::features::tasks::{Task, TaskId};

pub const HELP_TEXT: &str = "\
Commands:
  add                 add a task (prompts for each field)
  list                show active tasks
  delete <title|id>   delete every task with that title, or one by id prefix
  history             show deleted tasks
  help                show this message
  quit                exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add,
    List,
    Delete(String),
    History,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "add" | "new" => Command::Add,
            "list" | "ls" => Command::List,
            "delete" | "del" | "rm" if !rest.is_empty() => Command::Delete(rest.to_string()),
            "history" => Command::History,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        };
        Some(command)
    }
}

/// How a `delete` argument addresses tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Id(TaskId),
    Title(String),
}

/// Minimum id prefix length accepted as an id
const MIN_ID_PREFIX: usize = 4;

/// An exact title wins; otherwise a unique id prefix targets that task, and
/// anything else is treated as a title.
pub fn resolve_target(tasks: &[Task], arg: &str) -> DeleteTarget {
    let arg = arg.trim();
    if tasks.iter().any(|t| t.title == arg) {
        return DeleteTarget::Title(arg.to_string());
    }

    let prefix = arg.to_lowercase();

    if prefix.len() >= MIN_ID_PREFIX && prefix.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut matches = tasks
            .iter()
            .filter(|t| t.id.simple().to_string().starts_with(&prefix));
        if let (Some(task), None) = (matches.next(), matches.next()) {
            return DeleteTarget::Id(task.id);
        }
    }

    DeleteTarget::Title(arg.to_string())
}

pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "📋 No active tasks.".to_string();
    }

    let mut out = String::from("📋 Active tasks:\n");
    for task in tasks {
        out.push_str(&format!("\n[{}] {}\n", task.short_id(), task.render()));
    }
    out
}

pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "🗂️ History is empty.".to_string();
    }

    let mut out = String::from("🗂️ Deleted tasks:\n");
    for entry in entries {
        out.push_str(&format!("\n{}\n", entry.render()));
    }
    out
}
