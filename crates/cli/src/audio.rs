//! Software master volume
//!
//! The console front end has no audio device to drive, so the mixer keeps
//! the level and mute state itself and logs every change.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use athena::{collaborators::ControlResult, VolumeControl};
use async_trait::async_trait;
use tracing::info;

pub struct SoftwareMixer {
    level: AtomicU8,
    muted: AtomicBool,
}

impl SoftwareMixer {
    pub fn new(initial_percent: u8) -> Self {
        Self {
            level: AtomicU8::new(initial_percent.min(100)),
            muted: AtomicBool::new(false),
        }
    }

    /// Current level in percent
    pub fn level(&self) -> u8 {
        self.level.load(Ordering::SeqCst)
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    fn store(&self, percent: i32) {
        let percent = percent.clamp(0, 100) as u8;
        self.level.store(percent, Ordering::SeqCst);
        info!(level = percent, "Volume changed");
    }
}

impl Default for SoftwareMixer {
    fn default() -> Self {
        Self::new(50)
    }
}

#[async_trait]
impl VolumeControl for SoftwareMixer {
    async fn set_volume(&self, level: f32) -> ControlResult<()> {
        self.store((level.clamp(0.0, 1.0) * 100.0).round() as i32);
        Ok(())
    }

    async fn change_volume(&self, delta: i32) -> ControlResult<()> {
        self.store(i32::from(self.level()) + delta);
        Ok(())
    }

    async fn mute(&self) -> ControlResult<()> {
        self.muted.store(true, Ordering::SeqCst);
        info!("Audio muted");
        Ok(())
    }

    async fn unmute(&self) -> ControlResult<()> {
        self.muted.store(false, Ordering::SeqCst);
        info!("Audio unmuted");
        Ok(())
    }
}
