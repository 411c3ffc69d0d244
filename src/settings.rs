//! Game settings and preferences
//!
//! Persisted separately from the high score under its own store key.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, SETTINGS_KEY, StoreError, load_json, save_json};
use crate::sim::StartConfig;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Sound muted
    pub muted: bool,
    /// Defaults offered by the start screen
    pub start: StartConfig,
}

impl Settings {
    /// Start configuration for a new run with the given seed
    pub fn start_config(&self, seed: u64) -> StartConfig {
        StartConfig {
            seed,
            ..self.start.clone()
        }
        .normalized()
    }

    /// Load settings, falling back to defaults when absent or unreadable
    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json::<Settings>(store, SETTINGS_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        save_json(store, SETTINGS_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
