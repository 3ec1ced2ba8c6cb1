//! User settings and preferences
//!
//! Persisted as JSON next to the high score file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, StoreError};

/// Default file name inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Volume change per options key press
pub const VOLUME_STEP: f32 = 0.05;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sound effects and engine loop volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Screen shake on hits
    pub screen_shake: bool,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx_volume: 0.45,
            music_volume: 0.35,
            screen_shake: true,
            muted: false,
        }
    }
}

impl Settings {
    /// Nudge SFX volume by `steps` increments, clamped to [0, 1]
    pub fn step_sfx(&mut self, steps: i32) {
        self.sfx_volume = step_volume(self.sfx_volume, steps);
    }

    pub fn step_music(&mut self, steps: i32) {
        self.music_volume = step_volume(self.music_volume, steps);
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match persistence::read_json::<Settings>(path) {
            Ok(mut settings) => {
                settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
                settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to `path`; failures are logged
    pub fn save(&self, path: &Path) {
        match persistence::write_json(path, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

fn step_volume(volume: f32, steps: i32) -> f32 {
    // Round to whole percent so repeated steps don't drift
    let raw = volume + steps as f32 * VOLUME_STEP;
    ((raw * 100.0).round() / 100.0).clamp(0.0, 1.0)
}
