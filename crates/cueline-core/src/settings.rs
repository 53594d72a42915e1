use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::Color;

/// The fixed coordinate space all detections are rescaled into before geometry and
/// rendering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceFrame {
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl ReferenceFrame {
    pub const FULL_HD: ReferenceFrame = ReferenceFrame {
        width: 1920.0,
        height: 1080.0,
    };
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        Self::FULL_HD
    }
}

/// Tuning for the single-path shot prediction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotParams {
    /// A pocket closer than this to the target ball becomes the exit point, in pixels.
    pub capture_radius: f64,
    /// How far the exit ray is extended before clipping against the table, in pixels.
    pub extension: f64,
}

impl Default for ShotParams {
    fn default() -> Self {
        Self {
            capture_radius: 20.0,
            extension: 1000.0,
        }
    }
}

/// Settings for the detection model wrapper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    /// Rows with a confidence at or below this are dropped.
    pub confidence_threshold: f32,
    /// Model input width in pixels
    pub input_width: u32,
    /// Model input height in pixels
    pub input_height: u32,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.4,
            input_width: 640,
            input_height: 640,
        }
    }
}

/// Which query the frame loop renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotMode {
    /// Aim line, ghost ball line and one line to every pocket.
    #[default]
    Guideline,
    /// Cue to ghost ball, then a single best-guess exit path.
    PredictedPath,
}

/// Settings for the overlay and the frame loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub mode: ShotMode,
    pub color: Color,
    /// Draw a circle the size of the cue ball at the ghost ball position.
    pub draw_ghost_ball: bool,
    pub ghost_ball_color: Color,
    /// Time between frames, in milliseconds.
    pub frame_interval_ms: u64,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            mode: ShotMode::Guideline,
            color: Color::RED,
            draw_ghost_ball: false,
            ghost_ball_color: Color::WHITE,
            frame_interval_ms: 16,
        }
    }
}

/// All runtime settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuelineSettings {
    pub reference: ReferenceFrame,
    pub shot: ShotParams,
    pub detector: DetectorSettings,
    pub overlay: OverlaySettings,
}

impl CuelineSettings {
    /// Load the settings from a file, or store the default settings if the file does
    /// not exist. A file that cannot be parsed is left alone and the defaults are used.
    pub fn load_or_insert(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => Ok(settings),
                Err(err) => {
                    log::warn!("Failed to parse settings {}: {}", path.display(), err);
                    Ok(Self::default())
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.store(path)?;
                log::info!("Created default settings at {}", path.display());
                Ok(settings)
            }
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read settings {}", path.display()))
            }
        }
    }

    /// Store the settings in the given file.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CuelineSettings::default();
        assert_eq!(settings.reference.width, 1920.0);
        assert_eq!(settings.reference.height, 1080.0);
        assert_eq!(settings.shot.capture_radius, 20.0);
        assert_eq!(settings.shot.extension, 1000.0);
        assert_eq!(settings.detector.confidence_threshold, 0.4);
        assert_eq!(settings.overlay.mode, ShotMode::Guideline);
        assert_eq!(settings.overlay.color, Color::RED);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: CuelineSettings =
            serde_json::from_str(r#"{ "reference": { "width": 2560.0 }, "overlay": { "mode": "PredictedPath" } }"#)
                .unwrap();
        assert_eq!(settings.reference.width, 2560.0);
        assert_eq!(settings.reference.height, 1080.0);
        assert_eq!(settings.overlay.mode, ShotMode::PredictedPath);
        assert_eq!(settings.overlay.frame_interval_ms, 16);
        assert_eq!(settings.shot, ShotParams::default());
    }

    #[test]
    fn test_load_or_insert_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = CuelineSettings::load_or_insert(&path).unwrap();
        assert_eq!(settings, CuelineSettings::default());
        assert!(path.exists());

        let mut changed = settings.clone();
        changed.shot.capture_radius = 35.0;
        changed.store(&path).unwrap();
        let loaded = CuelineSettings::load_or_insert(&path).unwrap();
        assert_eq!(loaded.shot.capture_radius, 35.0);
    }

    #[test]
    fn test_load_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        let settings = CuelineSettings::load_or_insert(&path).unwrap();
        assert_eq!(settings, CuelineSettings::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
    }
}
