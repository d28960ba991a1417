//! Environment-driven configuration.
//!
//! Values are read from the process environment (after `.env` is loaded by the
//! binary). Every setting has a default so a bare `taskbell` invocation works.

use anyhow::{anyhow, Result};
use std::env;

use crate::features::reminders::Permission;

/// Default store file for the SQLite backing
pub const DEFAULT_STORE_PATH: &str = "taskbell.db";

/// Locale handed to the speech synthesizer
pub const DEFAULT_SPEECH_LOCALE: &str = "en-IN";

/// Audio cue played when a reminder fires with sound enabled
pub const DEFAULT_SOUND_URL: &str = "https://www.soundjay.com/button/beep-07.wav";

/// Icon attached to desktop notifications
pub const DEFAULT_NOTIFICATION_ICON: &str = "https://via.placeholder.com/100";

#[derive(Debug, Clone)]
pub struct Config {
    pub store_path: String,
    pub log_level: String,
    pub speech_locale: String,
    pub speech_command: String,
    pub sound_url: String,
    pub audio_player: String,
    pub notification_icon: String,
    /// Answer given when the console surface is asked for notification permission
    pub notification_permission: Permission,
    /// Re-arm reminders for still-future tasks when the store is loaded
    pub rearm_on_load: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_path: DEFAULT_STORE_PATH.to_string(),
            log_level: "info".to_string(),
            speech_locale: DEFAULT_SPEECH_LOCALE.to_string(),
            speech_command: "espeak".to_string(),
            sound_url: DEFAULT_SOUND_URL.to_string(),
            audio_player: "aplay".to_string(),
            notification_icon: DEFAULT_NOTIFICATION_ICON.to_string(),
            notification_permission: Permission::Granted,
            rearm_on_load: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let notification_permission = match env::var("TASKBELL_NOTIFICATIONS") {
            Ok(value) => value.parse::<Permission>()?,
            Err(_) => defaults.notification_permission,
        };

        let rearm_on_load = match env::var("TASKBELL_REARM_ON_LOAD") {
            Ok(value) => parse_bool(&value)
                .ok_or_else(|| anyhow!("TASKBELL_REARM_ON_LOAD must be true or false, got '{}'", value))?,
            Err(_) => defaults.rearm_on_load,
        };

        Ok(Config {
            store_path: env::var("TASKBELL_STORE_PATH").unwrap_or(defaults.store_path),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            speech_locale: env::var("TASKBELL_SPEECH_LOCALE").unwrap_or(defaults.speech_locale),
            speech_command: env::var("TASKBELL_SPEECH_COMMAND").unwrap_or(defaults.speech_command),
            sound_url: env::var("TASKBELL_SOUND_URL").unwrap_or(defaults.sound_url),
            audio_player: env::var("TASKBELL_AUDIO_PLAYER").unwrap_or(defaults.audio_player),
            notification_icon: env::var("TASKBELL_NOTIFICATION_ICON")
                .unwrap_or(defaults.notification_icon),
            notification_permission,
            rearm_on_load,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
