//! # Features
//!
//! - `tasks`: task records and the persisted repository
//! - `reminders`: one-shot timers and reminder delivery
//! - `history`: append-only log of deleted tasks

pub mod history;
pub mod reminders;
pub mod tasks;

pub use history::{HistoryEntry, HistoryLog};
pub use reminders::{Reminder, ReminderDelivery, ReminderScheduler};
pub use tasks::{Task, TaskForm, TaskId, TaskRepository};
