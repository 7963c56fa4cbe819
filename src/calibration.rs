//! Extension icon calibration
//!
//! The calibration file is a plain `KEY=VALUE` record written by the
//! calibration script. Only the two icon coordinates are consumed; anything
//! else (e.g. `METHOD=...`) is ignored. A missing or partial file is never an
//! error: the locator degrades to a fixed estimate instead.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ICON_X_KEY: &str = "EXTENSION_ICON_X";
pub const ICON_Y_KEY: &str = "EXTENSION_ICON_Y";

/// Estimated toolbar position used when no calibration is available
pub const FALLBACK_ICON_POSITION: IconPosition = IconPosition { x: 1250, y: 80 };

/// Screen coordinates of the extension icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconPosition {
    pub x: i32,
    pub y: i32,
}

impl IconPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for IconPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Coordinates read from a calibration file; either may be absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calibration {
    pub icon_x: Option<i32>,
    pub icon_y: Option<i32>,
}

impl Calibration {
    /// Parse `KEY=VALUE` lines, keeping the last value seen for each key.
    pub fn parse(content: &str) -> Self {
        let mut calibration = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };

            let slot = match key.trim() {
                ICON_X_KEY => &mut calibration.icon_x,
                ICON_Y_KEY => &mut calibration.icon_y,
                _ => continue,
            };

            match value.trim().parse::<i32>() {
                Ok(parsed) => *slot = Some(parsed),
                Err(e) => log::debug!("Ignoring unparsable {}={:?}: {}", key.trim(), value, e),
            }
        }

        calibration
    }

    /// Both coordinates present and non-zero
    pub fn position(&self) -> Option<IconPosition> {
        match (self.icon_x, self.icon_y) {
            (Some(x), Some(y)) if x != 0 && y != 0 => Some(IconPosition { x, y }),
            _ => None,
        }
    }
}

/// Where a resolved icon position came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum IconSource {
    Calibrated(PathBuf),
    /// Estimated position. [`locate_icon`] logs the calibration hint exactly
    /// when it returns this, so callers can rely on it instead of the log.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocatedIcon {
    pub position: IconPosition,
    pub source: IconSource,
}

impl LocatedIcon {
    pub fn is_calibrated(&self) -> bool {
        matches!(self.source, IconSource::Calibrated(_))
    }
}

/// Resolve the icon position, preferring the calibration file.
pub fn locate_icon(calibration_file: Option<&Path>) -> LocatedIcon {
    log::info!("Locating extension icon...");

    if let Some(path) = calibration_file {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                if let Some(position) = Calibration::parse(&content).position() {
                    log::info!(
                        "Using calibrated coordinates from {}: {}",
                        path.display(),
                        position
                    );
                    return LocatedIcon {
                        position,
                        source: IconSource::Calibrated(path.to_path_buf()),
                    };
                }
                log::warn!(
                    "Calibration file {} is missing {} or {}",
                    path.display(),
                    ICON_X_KEY,
                    ICON_Y_KEY
                );
            }
            Err(e) => log::debug!("No calibration at {}: {}", path.display(), e),
        }
    }

    log::warn!(
        "No calibrated coordinates found, using estimated position {}",
        FALLBACK_ICON_POSITION
    );
    log::info!(
        "For better accuracy, run calibration: cd apps/qa/scripts && ./calibrate_extension_icon.sh"
    );

    LocatedIcon {
        position: FALLBACK_ICON_POSITION,
        source: IconSource::Fallback,
    }
}
