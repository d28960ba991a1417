// Core layer - configuration and error types
pub mod core;

// Storage layer - key-value backings for the task and history collections
pub mod storage;

// Features layer - tasks, reminders, history
pub mod features;

// Application layer
pub mod console;
pub mod desk;

pub use crate::core::{Config, TaskError, ValidationError};
pub use desk::ReminderDesk;

pub use features::{
    // History
    HistoryEntry, HistoryLog,
    // Reminders
    Reminder, ReminderDelivery, ReminderScheduler,
    // Tasks
    Task, TaskForm, TaskId, TaskRepository,
};

pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
