//! Fan-out of a fired reminder to sound, speech and popup.
//!
//! Sound and speech are best effort: their failures are captured in the
//! [`DeliveryReport`] and logged, never propagated. The popup branches on the
//! permission state at fire time.

use log::{debug, info, warn};
use std::sync::Arc;

use super::scheduler::Reminder;
use super::surfaces::{AudioCue, NotificationSurface, Permission, Speaker};
use crate::core::config::{DEFAULT_NOTIFICATION_ICON, DEFAULT_SOUND_URL, DEFAULT_SPEECH_LOCALE};
use crate::core::Config;

/// Title of the reminder notification
pub const NOTIFICATION_TITLE: &str = "🔔 Task Reminder";

/// Alert shown when notification permission is refused
pub const PERMISSION_BLOCKED_MESSAGE: &str = "Notifications are blocked. Reminders may not work.";

/// Result of one best-effort channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    Delivered,
    Skipped,
    Failed(String),
}

impl ChannelOutcome {
    fn from_result(result: anyhow::Result<()>) -> Self {
        match result {
            Ok(()) => ChannelOutcome::Delivered,
            Err(e) => ChannelOutcome::Failed(e.to_string()),
        }
    }
}

/// How the visible part of the reminder reached the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    Notification,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sound: ChannelOutcome,
    pub speech: ChannelOutcome,
    pub popup: Popup,
}

#[derive(Debug, Clone)]
pub struct DeliverySettings {
    pub speech_locale: String,
    pub sound_url: String,
    pub notification_icon: String,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        DeliverySettings {
            speech_locale: DEFAULT_SPEECH_LOCALE.to_string(),
            sound_url: DEFAULT_SOUND_URL.to_string(),
            notification_icon: DEFAULT_NOTIFICATION_ICON.to_string(),
        }
    }
}

impl From<&Config> for DeliverySettings {
    fn from(config: &Config) -> Self {
        DeliverySettings {
            speech_locale: config.speech_locale.clone(),
            sound_url: config.sound_url.clone(),
            notification_icon: config.notification_icon.clone(),
        }
    }
}

pub struct ReminderDelivery {
    surface: Arc<dyn NotificationSurface>,
    speaker: Arc<dyn Speaker>,
    audio: Arc<dyn AudioCue>,
    settings: DeliverySettings,
}

impl ReminderDelivery {
    pub fn new(
        surface: Arc<dyn NotificationSurface>,
        speaker: Arc<dyn Speaker>,
        audio: Arc<dyn AudioCue>,
        settings: DeliverySettings,
    ) -> Self {
        ReminderDelivery {
            surface,
            speaker,
            audio,
            settings,
        }
    }

    /// Ask for notification permission, alerting the user if it is not granted.
    pub async fn request_permission(&self) -> Permission {
        let permission = self.surface.request_permission().await;
        if permission != Permission::Granted {
            warn!("Notification permission is {permission}");
            self.surface.alert(PERMISSION_BLOCKED_MESSAGE).await;
        }
        permission
    }

    pub async fn alert(&self, message: &str) {
        self.surface.alert(message).await;
    }

    /// Speak `text` in the configured locale. Failures are logged and returned.
    pub async fn speak(&self, text: &str) -> ChannelOutcome {
        let outcome =
            ChannelOutcome::from_result(self.speaker.speak(text, &self.settings.speech_locale).await);
        if let ChannelOutcome::Failed(reason) = &outcome {
            warn!("Speech failed: {reason}");
        }
        outcome
    }

    pub async fn deliver(&self, reminder: &Reminder) -> DeliveryReport {
        info!("⏰ Reminder firing for '{}'", reminder.title);

        let sound = if reminder.sound {
            let outcome = ChannelOutcome::from_result(self.audio.play(&self.settings.sound_url).await);
            if let ChannelOutcome::Failed(reason) = &outcome {
                warn!("Audio cue failed: {reason}");
            }
            outcome
        } else {
            ChannelOutcome::Skipped
        };

        let speech = self.speak(&format!("Reminder: {}", reminder.title)).await;

        let popup = if self.surface.permission() == Permission::Granted {
            match self
                .surface
                .notify(
                    NOTIFICATION_TITLE,
                    &format!("Time to: {}", reminder.title),
                    &self.settings.notification_icon,
                )
                .await
            {
                Ok(()) => Popup::Notification,
                Err(e) => {
                    warn!("Notification failed, falling back to alert: {e}");
                    self.surface.alert(&format!("Reminder: {}", reminder.title)).await;
                    Popup::Alert
                }
            }
        } else {
            self.surface.alert(&format!("Reminder: {}", reminder.title)).await;
            Popup::Alert
        };

        let report = DeliveryReport {
            sound,
            speech,
            popup,
        };
        debug!("Delivery report for '{}': {:?}", reminder.title, report);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::testing::{Recorder, RecordingAudio, RecordingSpeaker, RecordingSurface};
    use chrono::Utc;
    use uuid::Uuid;

    fn reminder(sound: bool) -> Reminder {
        Reminder {
            task_id: Uuid::new_v4(),
            title: "Stretch".to_string(),
            due_at: Utc::now(),
            sound,
        }
    }

    fn delivery(
        permission: Permission,
        audio_fails: bool,
    ) -> (ReminderDelivery, Arc<Recorder>, Arc<RecordingSurface>) {
        let recorder = Arc::new(Recorder::default());
        let surface = Arc::new(RecordingSurface::new(permission, recorder.clone()));
        let delivery = ReminderDelivery::new(
            surface.clone(),
            Arc::new(RecordingSpeaker::new(recorder.clone())),
            Arc::new(RecordingAudio::new(recorder.clone(), audio_fails)),
            DeliverySettings::default(),
        );
        (delivery, recorder, surface)
    }

    #[tokio::test]
    async fn test_granted_permission_uses_notification() {
        let (delivery, recorder, surface) = delivery(Permission::Granted, false);
        surface.request_permission().await;

        let report = delivery.deliver(&reminder(true)).await;

        assert_eq!(report.sound, ChannelOutcome::Delivered);
        assert_eq!(report.speech, ChannelOutcome::Delivered);
        assert_eq!(report.popup, Popup::Notification);
        assert_eq!(
            recorder.events(),
            vec![
                format!("play:{DEFAULT_SOUND_URL}"),
                "speak[en-IN]:Reminder: Stretch".to_string(),
                "notify:🔔 Task Reminder|Time to: Stretch".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_without_permission_falls_back_to_alert() {
        let (delivery, recorder, _) = delivery(Permission::Denied, false);

        let report = delivery.deliver(&reminder(false)).await;

        assert_eq!(report.sound, ChannelOutcome::Skipped);
        assert_eq!(report.popup, Popup::Alert);
        assert_eq!(recorder.events().last().unwrap(), "alert:Reminder: Stretch");
    }

    #[tokio::test]
    async fn test_permission_is_read_at_fire_time() {
        let (delivery, _, surface) = delivery(Permission::Granted, false);
        assert_eq!(delivery.deliver(&reminder(false)).await.popup, Popup::Alert);

        surface.request_permission().await;
        assert_eq!(
            delivery.deliver(&reminder(false)).await.popup,
            Popup::Notification
        );
    }

    #[tokio::test]
    async fn test_audio_failure_degrades_quietly() {
        let (delivery, recorder, surface) = delivery(Permission::Granted, true);
        surface.request_permission().await;

        let report = delivery.deliver(&reminder(true)).await;

        assert!(matches!(report.sound, ChannelOutcome::Failed(_)));
        assert_eq!(report.speech, ChannelOutcome::Delivered);
        assert_eq!(report.popup, Popup::Notification);
        assert!(!recorder.events().iter().any(|e| e.starts_with("alert:")));
    }

    #[tokio::test]
    async fn test_denied_permission_alerts_once() {
        let (delivery, recorder, _) = delivery(Permission::Denied, false);

        assert_eq!(delivery.request_permission().await, Permission::Denied);
        assert_eq!(
            recorder.events(),
            vec![format!("alert:{PERMISSION_BLOCKED_MESSAGE}")]
        );
    }
}
