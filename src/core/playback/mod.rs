//! core/playback/mod.rs
//! Transport: a playback engine on its own thread, driven by commands and
//! reporting back through events.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crate::core::error::PlaybackError;
use crate::core::types::PlaybackPosition;

mod engine;

pub use engine::PlaybackEngine;

#[derive(Clone)]
pub struct PlaybackController {
    command_tx: Sender<PlayerCommand>,
}

impl PlaybackController {
    pub fn new(command_tx: Sender<PlayerCommand>) -> Self {
        Self { command_tx }
    }

    /// Fails once the engine thread has exited; the command is dropped.
    pub fn send(&self, cmd: PlayerCommand) -> Result<(), PlaybackError> {
        self.command_tx
            .send(cmd)
            .map_err(|_| PlaybackError::EngineGone)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Decode `path` and make it the loaded source (paused at 0).
    Load(PathBuf),
    Start,
    Stop,
    /// Seconds from the start of the loaded source.
    Seek(f64),
    Shutdown,
}

#[derive(Debug, Clone)]
pub enum PlayerEvent {
    Loaded {
        path: PathBuf,
        duration_secs: f64,
    },
    /// The previous source (if any) is still loaded.
    LoadFailed {
        path: PathBuf,
        error: String,
    },
    TransportChanged {
        playing: bool,
    },
    Position(PlaybackPosition),
    /// Something went wrong with the loaded source; the engine keeps running.
    Error(String),
    /// No audio output. The engine thread has exited.
    EngineFailed(String),
}

/// Spawns the playback thread and returns:
/// - PlaybackController (store in GUI state)
/// - Receiver<PlayerEvent> (drained on the GUI tick)
pub fn start_playback(tick: Duration) -> (PlaybackController, Receiver<PlayerEvent>) {
    let (command_tx, command_rx) = mpsc::channel::<PlayerCommand>();
    let (event_tx, event_rx) = mpsc::channel::<PlayerEvent>();

    thread::spawn(move || {
        let mut engine = match PlaybackEngine::new(event_tx.clone(), tick) {
            Ok(e) => e,
            Err(err) => {
                tracing::error!("{err}");
                let _ = event_tx.send(PlayerEvent::EngineFailed(err.to_string()));
                return;
            }
        };

        tracing::info!("playback engine running");
        engine.run(command_rx);
        tracing::info!("playback engine stopped");
    });

    (PlaybackController::new(command_tx), event_rx)
}
