//! External collaborators the assistant talks to.
//!
//! Implementations live outside the core (the `athena` binary ships console,
//! process and HTTP backed ones); tests substitute recording fakes.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Failure reported by a device-control collaborator
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("Not supported on this platform: {0}")]
    Unsupported(String),

    #[error("Disabled: {0}")]
    Disabled(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ControlResult<T> = Result<T, ControlError>;

/// Speech recognition
#[async_trait]
pub trait SpeechInput: Send + Sync {
    /// Wait up to `timeout` for speech to start and up to `phrase_limit` for
    /// it to finish. Timeouts, unrecognized audio and service errors all
    /// come back as `None`; implementations log the latter.
    async fn listen_once(&self, timeout: Duration, phrase_limit: Duration) -> Option<String>;
}

/// Speech synthesis. Returns once the text has been spoken.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    async fn speak(&self, text: &str);
}

/// Application launcher and closer. Results are user-facing messages.
#[async_trait]
pub trait AppControl: Send + Sync {
    async fn open(&self, name: &str) -> String;
    async fn close(&self, name: &str) -> String;
}

/// Master volume
#[async_trait]
pub trait VolumeControl: Send + Sync {
    /// Absolute level in `0.0..=1.0`
    async fn set_volume(&self, level: f32) -> ControlResult<()>;
    /// Relative change in percentage points
    async fn change_volume(&self, delta: i32) -> ControlResult<()>;
    async fn mute(&self) -> ControlResult<()>;
    async fn unmute(&self) -> ControlResult<()>;
}

/// Answers free-form questions and search queries
#[async_trait]
pub trait WebInformationProvider: Send + Sync {
    async fn get_information(&self, query: &str) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerAction {
    Shutdown,
    Restart,
    Sleep,
}

impl PowerAction {
    pub fn announcement(&self) -> &'static str {
        match self {
            PowerAction::Shutdown => "Shutting down the computer",
            PowerAction::Restart => "Restarting the computer",
            PowerAction::Sleep => "Putting the computer to sleep",
        }
    }
}

/// Power management
#[async_trait]
pub trait SystemPower: Send + Sync {
    async fn perform(&self, action: PowerAction) -> ControlResult<()>;
}
