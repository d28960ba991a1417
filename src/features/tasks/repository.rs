//! Task repository over the key-value store.
//!
//! Every mutation is a read-modify-write of the whole `tasks` collection.

use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;

use super::form::TaskForm;
use super::model::{StoredTask, Task, TaskId};
use crate::core::TaskError;
use crate::storage::{load_collection, save_collection, KeyValueStore, TASKS_KEY};

#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn KeyValueStore>,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        TaskRepository { store }
    }

    /// Validate and persist a new task. On a validation error nothing is written.
    pub async fn add_task(&self, form: &TaskForm) -> Result<Task, TaskError> {
        let task = form.validate(Utc::now())?;

        let mut tasks = self.list_tasks().await?;
        tasks.push(task.clone());
        save_collection(self.store.as_ref(), TASKS_KEY, &tasks).await?;

        info!("Added task {} '{}' due {}", task.short_id(), task.title, task.date);
        Ok(task)
    }

    /// All persisted tasks in insertion order.
    ///
    /// Older records are normalized (id assigned, `ampm` folded into a 24-hour
    /// hour) and the collection is written back once so ids stay stable.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, TaskError> {
        let stored: Vec<StoredTask> = load_collection(self.store.as_ref(), TASKS_KEY).await?;
        let upgrades = stored.iter().filter(|t| t.needs_upgrade()).count();

        let tasks = stored
            .into_iter()
            .map(StoredTask::into_task)
            .collect::<Result<Vec<_>, _>>()?;

        if upgrades > 0 {
            save_collection(self.store.as_ref(), TASKS_KEY, &tasks).await?;
            warn!("Upgraded {upgrades} stored task record(s) to the current format");
        }
        Ok(tasks)
    }

    pub async fn get(&self, id: TaskId) -> Result<Option<Task>, TaskError> {
        Ok(self.list_tasks().await?.into_iter().find(|t| t.id == id))
    }

    /// Remove every task whose title matches exactly. Returns the removed records.
    pub async fn remove_by_title(&self, title: &str) -> Result<Vec<Task>, TaskError> {
        self.remove_where(|t| t.title == title).await
    }

    /// Remove the task with `id`, if present.
    pub async fn remove(&self, id: TaskId) -> Result<Option<Task>, TaskError> {
        Ok(self.remove_where(|t| t.id == id).await?.into_iter().next())
    }

    async fn remove_where<F>(&self, predicate: F) -> Result<Vec<Task>, TaskError>
    where
        F: Fn(&Task) -> bool,
    {
        let tasks = self.list_tasks().await?;
        let (removed, kept): (Vec<Task>, Vec<Task>) = tasks.into_iter().partition(|t| predicate(t));

        if removed.is_empty() {
            debug!("No matching task to remove");
            return Ok(removed);
        }

        save_collection(self.store.as_ref(), TASKS_KEY, &kept).await?;
        info!("Removed {} task(s), {} remaining", removed.len(), kept.len());
        Ok(removed)
    }
}
