//! Recording surface doubles shared by reminder and desk tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::surfaces::{AudioCue, NotificationSurface, Permission, Speaker};

/// Ordered log of everything the surfaces were asked to do
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

pub struct RecordingSurface {
    policy: Permission,
    state: Mutex<Permission>,
    recorder: Arc<Recorder>,
}

impl RecordingSurface {
    pub fn new(policy: Permission, recorder: Arc<Recorder>) -> Self {
        RecordingSurface {
            policy,
            state: Mutex::new(Permission::Default),
            recorder,
        }
    }
}

#[async_trait]
impl NotificationSurface for RecordingSurface {
    async fn request_permission(&self) -> Permission {
        *self.state.lock().unwrap() = self.policy;
        self.policy
    }

    fn permission(&self) -> Permission {
        *self.state.lock().unwrap()
    }

    async fn notify(&self, title: &str, body: &str, _icon: &str) -> Result<()> {
        self.recorder.push(format!("notify:{title}|{body}"));
        Ok(())
    }

    async fn alert(&self, message: &str) {
        self.recorder.push(format!("alert:{message}"));
    }
}

pub struct RecordingSpeaker {
    recorder: Arc<Recorder>,
}

impl RecordingSpeaker {
    pub fn new(recorder: Arc<Recorder>) -> Self {
        RecordingSpeaker { recorder }
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str, locale: &str) -> Result<()> {
        self.recorder.push(format!("speak[{locale}]:{text}"));
        Ok(())
    }
}

pub struct RecordingAudio {
    recorder: Arc<Recorder>,
    fail: bool,
}

impl RecordingAudio {
    pub fn new(recorder: Arc<Recorder>, fail: bool) -> Self {
        RecordingAudio { recorder, fail }
    }
}

#[async_trait]
impl AudioCue for RecordingAudio {
    async fn play(&self, url: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow!("network unreachable"));
        }
        self.recorder.push(format!("play:{url}"));
        Ok(())
    }
}
