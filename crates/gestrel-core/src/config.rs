//! Persistent configuration for gestrel.
//!
//! Stores user settings in `~/.gestrel/config.json`: the scroll-into-view
//! timing defaults and an optional default gesture speed. Missing or
//! unparseable files fall back to defaults so tests never fail on a bad
//! local config.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CONFIG_FILENAME: &str = "config.json";

/// Directory holding gestrel's persistent state (`~/.gestrel`).
pub fn gestrel_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gestrel")
}

fn default_scroll_timeout_ms() -> u64 {
    90_000
}

fn default_scroll_poll_interval_ms() -> u64 {
    250
}

/// Persistent gestrel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestrelConfig {
    /// Overall scroll-into-view deadline in milliseconds.
    #[serde(default = "default_scroll_timeout_ms")]
    pub scroll_timeout_ms: u64,

    /// Pause between scroll-into-view poll ticks in milliseconds.
    #[serde(default = "default_scroll_poll_interval_ms")]
    pub scroll_poll_interval_ms: u64,

    /// Default gesture speed in px/s, applied when a call passes no speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gesture_speed: Option<u32>,
}

impl Default for GestrelConfig {
    fn default() -> Self {
        Self {
            scroll_timeout_ms: default_scroll_timeout_ms(),
            scroll_poll_interval_ms: default_scroll_poll_interval_ms(),
            gesture_speed: None,
        }
    }
}

impl GestrelConfig {
    /// Load config from `~/.gestrel/config.json`.
    ///
    /// Returns [`Default`] if the file does not exist or cannot be parsed.
    pub fn load() -> Self {
        let path = gestrel_dir().join(CONFIG_FILENAME);
        std::fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to `~/.gestrel/config.json`.
    pub fn save(&self) -> std::io::Result<()> {
        let dir = gestrel_dir();
        std::fs::create_dir_all(&dir)?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(dir.join(CONFIG_FILENAME), json)
    }
}
