//! Reveal flow configuration

use crate::Result;
use reveal_vault::Platform;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Startup delay on platforms where the OS prompt races the view becoming
/// visible (the UI freezes if the prompt is raised too early)
pub const ANDROID_STARTUP_DELAY_MS: u64 = 300;

/// Reveal flow configuration, resolved once when the controller is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Delay between `start` and the first vault request (milliseconds)
    pub startup_delay_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            startup_delay_ms: 0,
        }
    }
}

impl RevealConfig {
    /// Profile for a platform
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Android => Self {
                startup_delay_ms: ANDROID_STARTUP_DELAY_MS,
            },
            _ => Self::default(),
        }
    }

    /// Profile for the platform this binary runs on
    pub fn for_current_platform() -> Self {
        Self::for_platform(Platform::current())
    }

    /// Override the startup delay
    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Startup delay as a duration
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
