//! Core data types shared between core logic and the UI.
//!
//! Rule of thumb:
//! - These structs should be "boring bags of data"
//! - No GUI code
//! - No audio device code

use std::path::PathBuf;

/// Where the transport is, and how long the loaded stream is.
///
/// Re-derived from the loaded source on every engine tick; nothing else
/// keeps its own copy of the position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackPosition {
    pub position_secs: f64,
    pub duration_secs: f64,
}

impl PlaybackPosition {
    pub fn new(position_secs: f64, duration_secs: f64) -> Self {
        Self {
            position_secs,
            duration_secs,
        }
    }

    /// Zero, negative or NaN durations have no meaningful timeline.
    pub fn has_duration(&self) -> bool {
        self.duration_secs > 0.0
    }
}

/// What the coordinator knows about the stream the engine currently owns.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    pub path: PathBuf,
    pub duration_secs: f64,
}

/// Enabled state of the transport buttons.
///
/// Always derived from (transport state, source loaded); never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub play_enabled: bool,
    pub stop_enabled: bool,
}
