//! Raw form input and its validation into a [`Task`].

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::model::{Meridiem, Priority, Repeat, Task};
use crate::core::ValidationError;

/// Unvalidated input as collected by a front-end
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// 12-hour clock hour, 1 through 12
    pub hour: String,
    pub minute: String,
    pub meridiem: String,
    pub repeat: String,
    pub priority: String,
    /// Comma-separated labels
    pub tags: String,
    pub sound: bool,
}

impl Default for TaskForm {
    fn default() -> Self {
        TaskForm {
            title: String::new(),
            date: String::new(),
            hour: String::new(),
            minute: String::new(),
            meridiem: "AM".to_string(),
            repeat: "none".to_string(),
            priority: "low".to_string(),
            tags: String::new(),
            sound: true,
        }
    }
}

impl TaskForm {
    /// Validate the form against `now` and build the record to persist.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<Task, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(self.date.clone()))?;

        let hour: u32 = self
            .hour
            .trim()
            .parse()
            .ok()
            .filter(|h| (1..=12).contains(h))
            .ok_or_else(|| ValidationError::InvalidHour(self.hour.clone()))?;

        let minute: u32 = self
            .minute
            .trim()
            .parse()
            .ok()
            .filter(|m| *m < 60)
            .ok_or_else(|| ValidationError::InvalidMinute(self.minute.clone()))?;

        let meridiem: Meridiem = self.meridiem.parse()?;
        let repeat: Repeat = self.repeat.parse()?;
        let priority: Priority = self.priority.parse()?;

        let task = Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            date,
            hour: meridiem.to_24_hour(hour),
            minute,
            repeat,
            priority,
            tags: parse_tags(&self.tags),
            sound: self.sound,
            created_at: now,
        };

        let due = task.due_at().ok_or_else(|| {
            ValidationError::NonexistentLocalTime(format!("{} {}", task.date, task.clock_12h()))
        })?;
        if due <= now {
            return Err(ValidationError::DueInPast);
        }

        Ok(task)
    }
}

/// Split comma-separated labels, trimming whitespace and dropping empties and repeats.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
