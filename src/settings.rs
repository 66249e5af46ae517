//! Draw presentation preferences
//!
//! Persisted separately from the draw session.

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::error::Result;
use crate::persistence::KeyValueStore;

/// Shortest reveal the draw animation may use (ms)
pub const MIN_REVEAL_DELAY_MS: u32 = 400;
/// Longest reveal the draw animation may use (ms)
pub const MAX_REVEAL_DELAY_MS: u32 = 800;

/// Reveal timing and accessibility preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Time between a draw request and the number being revealed
    pub reveal_delay_ms: u32,
    /// How often the placeholder number changes during the reveal
    pub placeholder_interval_ms: u32,
    /// Skip the reveal delay entirely
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 600,
            placeholder_interval_ms: 50,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Reveal delay clamped to the allowed window (0 with reduced motion)
    pub fn effective_reveal_delay_ms(&self) -> u32 {
        if self.reduced_motion {
            0
        } else {
            self.reveal_delay_ms
                .clamp(MIN_REVEAL_DELAY_MS, MAX_REVEAL_DELAY_MS)
        }
    }

    /// Number of placeholder frames shown during the reveal
    pub fn placeholder_frames(&self) -> u32 {
        let interval = self.placeholder_interval_ms.max(1);
        self.effective_reveal_delay_ms() / interval
    }

    /// Load settings, falling back to defaults
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match store.get(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save<S: KeyValueStore>(&self, store: &mut S) -> Result<()> {
        let json = serde_json::to_string(self)?;
        store.set(SETTINGS_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
