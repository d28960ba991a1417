//! Task record and its enumerated fields.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::ValidationError;

/// Stable identifier for a task. Titles may collide, ids never do.
pub type TaskId = Uuid;

fn new_task_id() -> TaskId {
    Uuid::new_v4()
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ValidationError::InvalidPriority(s.to_string())),
        }
    }
}

/// Repeat policy. Recorded with the task but never used to re-arm a reminder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    None,
    Daily,
    Weekly,
}

impl std::fmt::Display for Repeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Repeat::None => write!(f, "none"),
            Repeat::Daily => write!(f, "daily"),
            Repeat::Weekly => write!(f, "weekly"),
        }
    }
}

impl std::str::FromStr for Repeat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Repeat::None),
            "daily" => Ok(Repeat::Daily),
            "weekly" => Ok(Repeat::Weekly),
            _ => Err(ValidationError::InvalidRepeat(s.to_string())),
        }
    }
}

/// AM/PM marker on 12-hour form input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Meridiem {
    #[default]
    Am,
    Pm,
}

impl Meridiem {
    /// Convert a 12-hour clock hour to 24-hour.
    ///
    /// 12 AM is midnight, 12 PM is noon, other PM hours gain twelve.
    pub fn to_24_hour(self, hour: u32) -> u32 {
        match self {
            Meridiem::Am if hour == 12 => 0,
            Meridiem::Pm if hour < 12 => hour + 12,
            _ => hour,
        }
    }

    /// Split a 24-hour clock hour back into 12-hour form for display.
    pub fn from_24_hour(hour: u32) -> (u32, Meridiem) {
        match hour {
            0 => (12, Meridiem::Am),
            1..=11 => (hour, Meridiem::Am),
            12 => (12, Meridiem::Pm),
            _ => (hour - 12, Meridiem::Pm),
        }
    }
}

impl std::fmt::Display for Meridiem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Meridiem::Am => write!(f, "AM"),
            Meridiem::Pm => write!(f, "PM"),
        }
    }
}

impl std::str::FromStr for Meridiem {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AM" => Ok(Meridiem::Am),
            "PM" => Ok(Meridiem::Pm),
            _ => Err(ValidationError::InvalidMeridiem(s.to_string())),
        }
    }
}

/// A persisted task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier
    pub id: TaskId,

    pub title: String,

    /// Due calendar date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,

    /// Due hour on the 24-hour clock
    pub hour: u32,

    pub minute: u32,

    #[serde(default)]
    pub repeat: Repeat,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Play the audio cue when the reminder fires
    #[serde(default)]
    pub sound: bool,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// A `tasks` record as it sits in the store.
///
/// Records written by older front-ends may have no `id` and `created_at`, and
/// keep a 12-hour `hour` next to an `ampm` marker.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StoredTask {
    id: Option<TaskId>,
    title: String,
    date: NaiveDate,
    hour: u32,
    minute: u32,
    ampm: Option<String>,
    #[serde(default)]
    repeat: Repeat,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    sound: bool,
    created_at: Option<DateTime<Utc>>,
}

impl StoredTask {
    /// Whether the record differs from its normalized form and must be written back
    pub(crate) fn needs_upgrade(&self) -> bool {
        self.id.is_none() || self.created_at.is_none() || self.ampm.is_some()
    }

    /// Normalize into a [`Task`]: assign a missing id and fold `ampm` into a 24-hour `hour`.
    pub(crate) fn into_task(self) -> Result<Task, ValidationError> {
        let hour = match self.ampm.as_deref() {
            Some(marker) => marker.parse::<Meridiem>()?.to_24_hour(self.hour),
            None => self.hour,
        };

        Ok(Task {
            id: self.id.unwrap_or_else(new_task_id),
            title: self.title,
            date: self.date,
            hour,
            minute: self.minute,
            repeat: self.repeat,
            priority: self.priority,
            tags: self.tags,
            sound: self.sound,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }
}

impl Task {
    /// Naive local wall-clock due time
    pub fn due_naive(&self) -> Option<NaiveDateTime> {
        self.date.and_hms_opt(self.hour, self.minute, 0)
    }

    /// Due instant, resolving the wall-clock time in the local timezone.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant. Times in a
    /// DST gap have no instant and yield `None`.
    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        let naive = self.due_naive()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// `5:07 PM` style clock text
    pub fn clock_12h(&self) -> String {
        let (hour, meridiem) = Meridiem::from_24_hour(self.hour);
        format!("{}:{:02} {}", hour, self.minute, meridiem)
    }

    /// Plain-text card used for the task list and for history snapshots.
    pub fn render(&self) -> String {
        format!(
            "{}\n📅 {} ⏰ {} | 🔁 {}\n🏷️ Tags: {}\n🔥 Priority: {}",
            self.title,
            self.date.format("%Y-%m-%d"),
            self.clock_12h(),
            self.repeat,
            self.tags.join(", "),
            self.priority.to_string().to_uppercase()
        )
    }

    /// First eight characters of the id, enough to address a task from the console
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}
