//! Output surfaces a reminder is delivered through.
//!
//! Each surface is an async trait so the desk can run against the console
//! implementations here or against recording doubles in tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;
use tokio::process::Command;

/// Notification permission state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not asked yet
    #[default]
    Default,
    Granted,
    Denied,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::Default => write!(f, "default"),
            Permission::Granted => write!(f, "granted"),
            Permission::Denied => write!(f, "denied"),
        }
    }
}

impl std::str::FromStr for Permission {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" | "prompt" => Ok(Permission::Default),
            "granted" => Ok(Permission::Granted),
            "denied" => Ok(Permission::Denied),
            _ => Err(anyhow!("Invalid notification permission: {}", s)),
        }
    }
}

#[async_trait]
pub trait NotificationSurface: Send + Sync {
    /// Ask the user for permission to show notifications
    async fn request_permission(&self) -> Permission;

    /// Current permission state, read at fire time
    fn permission(&self) -> Permission;

    async fn notify(&self, title: &str, body: &str, icon: &str) -> Result<()>;

    /// Blocking fallback dialog
    async fn alert(&self, message: &str);
}

#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str, locale: &str) -> Result<()>;
}

#[async_trait]
pub trait AudioCue: Send + Sync {
    async fn play(&self, url: &str) -> Result<()>;
}

// ============================================================================
// Console implementations
// ============================================================================

/// Terminal notification surface. The permission "prompt" is answered by a
/// configured policy.
pub struct ConsoleSurface {
    policy: Permission,
    state: RwLock<Permission>,
}

impl ConsoleSurface {
    pub fn new(policy: Permission) -> Self {
        ConsoleSurface {
            policy,
            state: RwLock::new(Permission::Default),
        }
    }
}

#[async_trait]
impl NotificationSurface for ConsoleSurface {
    async fn request_permission(&self) -> Permission {
        if let Ok(mut state) = self.state.write() {
            *state = self.policy;
        }
        info!("Notification permission: {}", self.policy);
        self.policy
    }

    fn permission(&self) -> Permission {
        self.state.read().map(|s| *s).unwrap_or_default()
    }

    async fn notify(&self, title: &str, body: &str, _icon: &str) -> Result<()> {
        println!("\n{title}\n  {body}");
        Ok(())
    }

    async fn alert(&self, message: &str) {
        // BEL so the terminal flags the window
        eprintln!("\x07\n⚠️  {message}");
    }
}

/// Speech through an external text-to-speech binary (`espeak`, `say`, ...)
pub struct CommandSpeaker {
    program: String,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpeaker {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str, locale: &str) -> Result<()> {
        debug!("Speaking via {}: {text}", self.program);
        let output = Command::new(&self.program)
            .args(["-v", &locale.to_lowercase(), text])
            .output()
            .await
            .map_err(|e| anyhow!("Failed to run {}: {}", self.program, e))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(anyhow!("{} exited with {}: {}", self.program, output.status, stderr.trim()))
        }
    }
}

/// Fetches the cue over HTTP and hands it to a local player binary.
pub struct HttpAudioCue {
    client: reqwest::Client,
    player: String,
}

impl HttpAudioCue {
    pub fn new(player: impl Into<String>) -> Self {
        HttpAudioCue {
            client: reqwest::Client::new(),
            player: player.into(),
        }
    }

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("taskbell-cue-{}.wav", uuid::Uuid::new_v4()))
    }
}

#[async_trait]
impl AudioCue for HttpAudioCue {
    async fn play(&self, url: &str) -> Result<()> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        debug!("Fetched {} byte audio cue from {url}", bytes.len());

        let path = Self::scratch_path();
        tokio::fs::write(&path, &bytes).await?;

        let status = Command::new(&self.player).arg(&path).status().await;
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!("Failed to remove {}: {e}", path.display());
        }

        let status = status.map_err(|e| anyhow!("Failed to run {}: {}", self.player, e))?;
        if status.success() {
            Ok(())
        } else {
            Err(anyhow!("{} exited with {}", self.player, status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_parse() {
        assert_eq!("granted".parse::<Permission>().unwrap(), Permission::Granted);
        assert_eq!("DENIED".parse::<Permission>().unwrap(), Permission::Denied);
        assert_eq!("prompt".parse::<Permission>().unwrap(), Permission::Default);
        assert!("maybe".parse::<Permission>().is_err());
    }

    #[tokio::test]
    async fn test_console_permission_starts_unasked() {
        let surface = ConsoleSurface::new(Permission::Denied);
        assert_eq!(surface.permission(), Permission::Default);

        assert_eq!(surface.request_permission().await, Permission::Denied);
        assert_eq!(surface.permission(), Permission::Denied);
    }

    #[tokio::test]
    async fn test_missing_speech_binary_is_an_error() {
        let speaker = CommandSpeaker::new("taskbell-no-such-tts-binary");
        assert!(speaker.speak("hello", "en-IN").await.is_err());
    }
}
