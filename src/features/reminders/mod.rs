//! # Reminders Feature
//!
//! Cancellable one-shot reminder timers with sound, speech and popup delivery.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.1.0: Timers are cancellable per task; delivery reports typed outcomes
//! - 1.0.0: Initial release

pub mod delivery;
pub mod scheduler;
pub mod surfaces;

#[cfg(test)]
pub(crate) mod testing;

pub use delivery::{ChannelOutcome, DeliveryReport, DeliverySettings, Popup, ReminderDelivery};
pub use scheduler::{FiredReminder, Reminder, ReminderHandle, ReminderScheduler};
pub use surfaces::{
    AudioCue, CommandSpeaker, ConsoleSurface, HttpAudioCue, NotificationSurface, Permission,
    Speaker,
};
