//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Window and loop settings for [`crate::engine::run`].
///
/// `width`/`height` are logical pixels; the OS window is scaled up by the
/// integer `scale` factor. Mouse coordinates reported to the application are
/// logical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub vsync: bool,
}

impl Config {
    pub fn new(title: impl Into<String>, width: u32, height: u32, scale: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            scale,
            vsync: true,
        }
    }

    /// Save settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("fresco application", 640, 480, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_json() {
        let config = Config::new("demo", 320, 300, 2);
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title, "demo");
        assert_eq!((back.width, back.height, back.scale), (320, 300, 2));
        assert!(back.vsync);
    }
}
