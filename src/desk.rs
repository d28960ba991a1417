//! # Reminder Desk
//!
//! Wires the task repository, reminder scheduler, history log and delivery
//! surfaces together behind the operations a front-end calls.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: History is written before a task leaves the active list
//! - 1.1.0: Deleting a task cancels its pending reminder; optional re-arm on load
//! - 1.0.0: Initial release

use log::{info, warn};
use std::sync::Arc;

use crate::core::TaskError;
use crate::features::history::{HistoryEntry, HistoryLog};
use crate::features::reminders::{Reminder, ReminderDelivery, ReminderScheduler};
use crate::features::tasks::{Task, TaskForm, TaskId, TaskRepository};
use crate::storage::KeyValueStore;

pub struct ReminderDesk {
    tasks: TaskRepository,
    history: HistoryLog,
    scheduler: ReminderScheduler,
    delivery: Arc<ReminderDelivery>,
    rearm_on_load: bool,
}

impl ReminderDesk {
    pub fn new(store: Arc<dyn KeyValueStore>, delivery: Arc<ReminderDelivery>) -> Self {
        ReminderDesk {
            tasks: TaskRepository::new(store.clone()),
            history: HistoryLog::new(store),
            scheduler: ReminderScheduler::new(delivery.clone()),
            delivery,
            rearm_on_load: true,
        }
    }

    pub fn with_rearm_on_load(mut self, rearm: bool) -> Self {
        self.rearm_on_load = rearm;
        self
    }

    /// Replace the scheduler, e.g. one with a fired-reminder channel attached
    pub fn with_scheduler(mut self, scheduler: ReminderScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    /// Startup: ask for notification permission, load the stored tasks and,
    /// when enabled, re-arm the ones that are still in the future.
    pub async fn bootstrap(&self) -> Result<Vec<Task>, TaskError> {
        self.delivery.request_permission().await;

        let tasks = self.tasks.list_tasks().await?;
        info!("Loaded {} task(s) from store", tasks.len());

        if self.rearm_on_load {
            let armed = tasks
                .iter()
                .filter_map(Reminder::for_task)
                .filter_map(|reminder| self.scheduler.arm(reminder))
                .count();
            info!("Re-armed {armed} reminder(s)");
        }

        Ok(tasks)
    }

    /// Validate, persist and arm a new task, then speak a confirmation.
    ///
    /// Validation failures are alerted to the user and returned; nothing is stored.
    pub async fn add_task(&self, form: &TaskForm) -> Result<Task, TaskError> {
        let task = match self.tasks.add_task(form).await {
            Ok(task) => task,
            Err(TaskError::Validation(e)) => {
                warn!("Rejected task form: {e:?}");
                self.delivery.alert(&e.to_string()).await;
                return Err(TaskError::Validation(e));
            }
            Err(e) => return Err(e),
        };

        if let Some(reminder) = Reminder::for_task(&task) {
            self.scheduler.arm(reminder);
        }

        self.delivery
            .speak(&format!(
                "Task added: {}, due on {} at {}, priority {}",
                task.title,
                task.date,
                task.clock_12h(),
                task.priority
            ))
            .await;

        Ok(task)
    }

    /// Delete one task by id, cancel its reminder and log it to history.
    ///
    /// The history entry is written first; if that fails the task stays active.
    pub async fn delete_task(&self, id: TaskId) -> Result<Option<HistoryEntry>, TaskError> {
        let Some(task) = self.tasks.get(id).await? else {
            return Ok(None);
        };

        let entry = self.history.append(task.render()).await?;
        self.tasks.remove(id).await?;
        self.scheduler.cancel(&id);
        Ok(Some(entry))
    }

    /// Delete every task carrying `title`. One history entry per removed task.
    pub async fn delete_by_title(&self, title: &str) -> Result<Vec<HistoryEntry>, TaskError> {
        let doomed: Vec<Task> = self
            .tasks
            .list_tasks()
            .await?
            .into_iter()
            .filter(|t| t.title == title)
            .collect();
        if doomed.is_empty() {
            return Ok(Vec::new());
        }

        let entries = self
            .history
            .append_all(doomed.iter().map(Task::render).collect())
            .await?;
        for task in self.tasks.remove_by_title(title).await? {
            self.scheduler.cancel(&task.id);
        }
        Ok(entries)
    }

    pub async fn tasks(&self) -> Result<Vec<Task>, TaskError> {
        self.tasks.list_tasks().await
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>, TaskError> {
        self.history.entries().await
    }
}
