use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PreviewConfig {
    /// Frames per second for the terminal preview and snapshots
    #[serde(default = "PreviewConfig::default_fps")]
    pub fps: u32,
}

impl PreviewConfig {
    fn default_fps() -> u32 {
        30
    }

    /// Time between frames; fps is clamped to 1..=120
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.clamp(1, 120)))
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            fps: Self::default_fps(),
        }
    }
}
