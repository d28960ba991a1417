//! One-shot reminder timers.
//!
//! Each armed reminder is a spawned tokio task sleeping until the due instant.
//! Timers live only in this process; they are tracked per task id so deleting a
//! task can cancel its pending delivery.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use uuid::Uuid;

use super::delivery::{DeliveryReport, ReminderDelivery};
use crate::features::tasks::{Task, TaskId};

/// Longest single sleep; the remaining wait is re-measured against the wall
/// clock after each chunk.
const MAX_SLEEP_CHUNK: Duration = Duration::from_secs(60 * 60);

/// What gets delivered when a timer fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub task_id: TaskId,
    pub title: String,
    pub due_at: DateTime<Utc>,
    pub sound: bool,
}

impl Reminder {
    /// Reminder for a stored task. `None` when the due time has no local instant.
    pub fn for_task(task: &Task) -> Option<Self> {
        Some(Reminder {
            task_id: task.id,
            title: task.title.clone(),
            due_at: task.due_at()?,
            sound: task.sound,
        })
    }
}

/// Returned by [`ReminderScheduler::arm`] for a timer that was actually armed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderHandle {
    pub id: Uuid,
    pub task_id: TaskId,
    pub fires_at: DateTime<Utc>,
    pub delay: Duration,
}

/// Sent on the fired channel after each delivery
#[derive(Debug, Clone)]
pub struct FiredReminder {
    pub reminder: Reminder,
    pub report: DeliveryReport,
}

struct ArmedTimer {
    handle_id: Uuid,
    join: JoinHandle<()>,
}

pub struct ReminderScheduler {
    delivery: Arc<ReminderDelivery>,
    armed: Arc<DashMap<TaskId, ArmedTimer>>,
    fired_tx: Option<mpsc::UnboundedSender<FiredReminder>>,
}

impl ReminderScheduler {
    pub fn new(delivery: Arc<ReminderDelivery>) -> Self {
        ReminderScheduler {
            delivery,
            armed: Arc::new(DashMap::new()),
            fired_tx: None,
        }
    }

    /// Report every fired reminder on `tx`
    pub fn with_fired_channel(mut self, tx: mpsc::UnboundedSender<FiredReminder>) -> Self {
        self.fired_tx = Some(tx);
        self
    }

    /// Arm a one-shot timer for `reminder`.
    ///
    /// Returns `None` without arming anything when the due time is not in the
    /// future. Arming a task that already has a timer replaces that timer.
    pub fn arm(&self, reminder: Reminder) -> Option<ReminderHandle> {
        let delay = match (reminder.due_at - Utc::now()).to_std() {
            Ok(delay) if !delay.is_zero() => delay,
            _ => {
                debug!(
                    "Not arming '{}': due time {} already passed",
                    reminder.title, reminder.due_at
                );
                return None;
            }
        };

        let handle = ReminderHandle {
            id: Uuid::new_v4(),
            task_id: reminder.task_id,
            fires_at: reminder.due_at,
            delay,
        };

        // The timer waits for `go` so it cannot deregister before it is registered
        let (go_tx, go_rx) = oneshot::channel::<()>();
        let armed = self.armed.clone();
        let delivery = self.delivery.clone();
        let fired_tx = self.fired_tx.clone();
        let task_id = reminder.task_id;
        let handle_id = handle.id;

        let join = tokio::spawn(async move {
            if go_rx.await.is_err() {
                return;
            }
            wait_until(reminder.due_at).await;
            armed.remove_if(&task_id, |_, timer| timer.handle_id == handle_id);

            let report = delivery.deliver(&reminder).await;
            if let Some(tx) = fired_tx {
                let _ = tx.send(FiredReminder { reminder, report });
            }
        });

        if let Some(previous) = self.armed.insert(
            task_id,
            ArmedTimer {
                handle_id,
                join,
            },
        ) {
            debug!("Replacing pending timer for task {task_id}");
            previous.join.abort();
        }
        let _ = go_tx.send(());

        info!(
            "Armed reminder for task {} in {}s",
            task_id,
            handle.delay.as_secs()
        );
        Some(handle)
    }

    /// Cancel the pending timer for `task_id`. Returns whether one was pending.
    pub fn cancel(&self, task_id: &TaskId) -> bool {
        match self.armed.remove(task_id) {
            Some((_, timer)) => {
                timer.join.abort();
                info!("Cancelled reminder for task {task_id}");
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self, task_id: &TaskId) -> bool {
        self.armed.contains_key(task_id)
    }

    /// Number of timers still waiting to fire
    pub fn pending(&self) -> usize {
        self.armed.len()
    }

    /// Abort every pending timer
    pub fn cancel_all(&self) {
        let count = self.armed.len();
        self.armed.retain(|_, timer| {
            timer.join.abort();
            false
        });
        if count > 0 {
            info!("Cancelled {count} pending reminder(s)");
        }
    }
}

async fn wait_until(due_at: DateTime<Utc>) {
    while let Ok(remaining) = (due_at - Utc::now()).to_std() {
        if remaining.is_zero() {
            break;
        }
        sleep(remaining.min(MAX_SLEEP_CHUNK)).await;
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::delivery::{DeliverySettings, Popup};
    use crate::features::reminders::surfaces::Permission;
    use crate::features::reminders::testing::{
        Recorder, RecordingAudio, RecordingSpeaker, RecordingSurface,
    };
    use chrono::Duration as ChronoDuration;

    fn scheduler() -> (
        ReminderScheduler,
        mpsc::UnboundedReceiver<FiredReminder>,
        Arc<Recorder>,
    ) {
        let recorder = Arc::new(Recorder::default());
        let delivery = Arc::new(ReminderDelivery::new(
            Arc::new(RecordingSurface::new(Permission::Granted, recorder.clone())),
            Arc::new(RecordingSpeaker::new(recorder.clone())),
            Arc::new(RecordingAudio::new(recorder.clone(), false)),
            DeliverySettings::default(),
        ));
        let (tx, rx) = mpsc::unbounded_channel();
        (
            ReminderScheduler::new(delivery).with_fired_channel(tx),
            rx,
            recorder,
        )
    }

    fn reminder_in(millis: i64) -> Reminder {
        Reminder {
            task_id: Uuid::new_v4(),
            title: "Take a break".to_string(),
            due_at: Utc::now() + ChronoDuration::milliseconds(millis),
            sound: false,
        }
    }

    #[tokio::test]
    async fn test_past_reminder_is_dropped() {
        let (scheduler, _rx, _) = scheduler();
        let reminder = reminder_in(-1_000);
        let task_id = reminder.task_id;

        assert!(scheduler.arm(reminder).is_none());
        assert!(!scheduler.is_armed(&task_id));
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test]
    async fn test_future_reminder_fires_once() {
        let (scheduler, mut rx, recorder) = scheduler();
        let reminder = reminder_in(50);
        let task_id = reminder.task_id;

        let handle = scheduler.arm(reminder).unwrap();
        assert_eq!(handle.task_id, task_id);
        assert!(handle.delay > Duration::ZERO);
        assert!(scheduler.is_armed(&task_id));

        let fired = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fired.reminder.task_id, task_id);
        // Permission was never requested, so the popup falls back to an alert
        assert_eq!(fired.report.popup, Popup::Alert);
        assert!(!scheduler.is_armed(&task_id));
        assert!(recorder
            .events()
            .contains(&"alert:Reminder: Take a break".to_string()));
    }

    #[tokio::test]
    async fn test_cancelled_reminder_never_fires() {
        let (scheduler, mut rx, recorder) = scheduler();
        let reminder = reminder_in(100);
        let task_id = reminder.task_id;

        scheduler.arm(reminder).unwrap();
        assert!(scheduler.cancel(&task_id));
        assert!(!scheduler.cancel(&task_id));

        let waited = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
        assert!(waited.is_err());
        assert!(recorder.events().is_empty());
    }

    #[tokio::test]
    async fn test_rearming_replaces_previous_timer() {
        let (scheduler, mut rx, _) = scheduler();
        let first = reminder_in(100);
        let mut second = reminder_in(150);
        second.task_id = first.task_id;

        scheduler.arm(first).unwrap();
        scheduler.arm(second).unwrap();
        assert_eq!(scheduler.pending(), 1);

        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        let again = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
        assert!(again.is_err());
    }

    #[tokio::test]
    async fn test_cancel_all() {
        let (scheduler, _rx, _) = scheduler();
        scheduler.arm(reminder_in(10_000)).unwrap();
        scheduler.arm(reminder_in(20_000)).unwrap();
        assert_eq!(scheduler.pending(), 2);

        scheduler.cancel_all();
        assert_eq!(scheduler.pending(), 0);
    }
}
