//! GUI state + messages.
//! Pure data definitions used by update + view.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use super::display::WaveformDisplay;
use crate::core::config::AppConfig;
use crate::core::playback::{PlaybackController, PlayerCommand, PlayerEvent};
use crate::core::transport::TransportMachine;
use crate::core::types::{Controls, PlaybackPosition, SourceInfo};

/// App state
pub(crate) struct WaveThumb {
    pub config: AppConfig,
    pub status: String,

    // Transport
    pub transport: TransportMachine,
    /// Mirrors the engine's loaded source; `None` until a file loads.
    pub source: Option<SourceInfo>,
    /// Latest position reported by the engine.
    pub position: PlaybackPosition,

    // Engine (started on first open)
    pub playback: Option<PlaybackController>,
    pub playback_events: Option<Receiver<PlayerEvent>>,

    /// True while the open dialog is up or a load is in flight.
    pub opening: bool,
    /// Path sent with the last `Load` that hasn't been answered yet.
    pub pending_load: Option<PathBuf>,

    pub display: WaveformDisplay,
}

impl WaveThumb {
    pub(crate) fn new(config: AppConfig) -> Self {
        let display = WaveformDisplay::new(config.samples_per_peak, config.thumbnail_cache_entries);

        Self {
            config,
            status: "Open a WAV file to begin.".to_string(),

            transport: TransportMachine::new(),
            source: None,
            position: PlaybackPosition::default(),

            playback: None,
            playback_events: None,

            opening: false,
            pending_load: None,

            display,
        }
    }

    pub(crate) fn controls(&self) -> Controls {
        self.transport.controls(self.source.is_some())
    }
}

impl Drop for WaveThumb {
    fn drop(&mut self) {
        if let Some(controller) = &self.playback {
            // Already gone is fine here.
            let _ = controller.send(PlayerCommand::Shutdown);
        }
    }
}

/// Message = "something happened".
#[derive(Debug, Clone)]
pub(crate) enum Message {
    /// Timer: drain engine + thumbnail notifications, repaint overlay.
    Tick,

    OpenPressed,
    FileChosen(Option<PathBuf>),

    PlayPressed,
    StopPressed,

    /// Click/drag on the waveform, already converted to seconds.
    SeekRequested(f64),
}
