//! gui/update/transport.rs
//! GUI <-> playback engine bridge.
//!
//! - Button presses and engine notifications become `TransportEvent`s.
//! - The state machine decides; this module only runs the resulting effect.
//! - GUI never touches rodio directly.

use iced::Task;

use super::super::state::{Message, WaveThumb};
use crate::core::playback::{PlayerCommand, PlayerEvent, start_playback};
use crate::core::transport::{Effect, TransportEvent, TransportMachine};
use crate::core::types::{PlaybackPosition, SourceInfo};

use std::sync::mpsc::TryRecvError;
use std::time::Duration;

pub(crate) fn ensure_engine(state: &mut WaveThumb) {
    if state.playback.is_some() && state.playback_events.is_some() {
        return;
    }

    let (controller, events) = start_playback(Duration::from_millis(state.config.engine_tick_ms));
    state.playback = Some(controller);
    state.playback_events = Some(events);
}

/// Returns false if the engine was found dead (and has been released).
pub(crate) fn send(state: &mut WaveThumb, cmd: PlayerCommand) -> bool {
    let Some(controller) = &state.playback else {
        tracing::debug!("no engine yet; dropped {cmd:?}");
        return false;
    };

    match controller.send(cmd) {
        Ok(()) => true,
        Err(e) => {
            engine_lost(state, &e.to_string());
            false
        }
    }
}

/// The engine thread is gone. Forget it, along with the source it owned, so
/// the next open starts a fresh one. A file that was waiting on the engine
/// still gets its waveform.
pub(crate) fn engine_lost(state: &mut WaveThumb, reason: &str) {
    tracing::warn!("audio engine unavailable: {reason}");

    state.playback = None;
    state.playback_events = None;
    state.source = None;
    state.position = PlaybackPosition::default();
    state.transport = TransportMachine::new();

    state.opening = false;
    state.status = format!("Audio output unavailable: {reason}");

    if let Some(path) = state.pending_load.take() {
        state.display.set_file(&path);
    }
}

/// Feed `event` to the state machine and carry out what it asks for.
pub(crate) fn apply(state: &mut WaveThumb, event: TransportEvent) {
    let source_loaded = state.source.is_some();
    let Some(effect) = state.transport.handle(event, source_loaded) else {
        return;
    };

    match effect {
        Effect::Start => {
            send(state, PlayerCommand::Start);
        }
        Effect::Stop => {
            send(state, PlayerCommand::Stop);
        }
        Effect::Rewind => {
            state.position.position_secs = 0.0;
            if source_loaded {
                send(state, PlayerCommand::Seek(0.0));
            }
        }
    }
}

pub(crate) fn play(state: &mut WaveThumb) -> Task<Message> {
    apply(state, TransportEvent::PlayRequested);
    Task::none()
}

pub(crate) fn stop(state: &mut WaveThumb) -> Task<Message> {
    apply(state, TransportEvent::StopRequested);
    Task::none()
}

pub(crate) fn seek(state: &mut WaveThumb, secs: f64) -> Task<Message> {
    let Some(source) = &state.source else {
        return Task::none();
    };
    if source.duration_secs <= 0.0 {
        return Task::none();
    }

    let target = secs.clamp(0.0, source.duration_secs);
    if send(state, PlayerCommand::Seek(target)) {
        // Optimistic; the next Position event confirms.
        state.position.position_secs = target;
    }
    Task::none()
}

pub(crate) fn drain_events(state: &mut WaveThumb) {
    let Some(rx) = state.playback_events.as_ref() else {
        return;
    };

    let mut drained = Vec::new();
    let mut disconnected = false;
    loop {
        match rx.try_recv() {
            Ok(ev) => drained.push(ev),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                disconnected = true;
                break;
            }
        }
    }

    for ev in drained {
        handle_event(state, ev);
    }

    // An init failure already released it while handling the events.
    if disconnected && state.playback_events.is_some() {
        engine_lost(state, "playback thread exited");
    }
}

pub(crate) fn handle_event(state: &mut WaveThumb, event: PlayerEvent) {
    match event {
        PlayerEvent::Loaded {
            path,
            duration_secs,
        } => {
            state.opening = false;
            state.pending_load = None;
            state.source = Some(SourceInfo {
                path: path.clone(),
                duration_secs,
            });
            state.position = PlaybackPosition::new(0.0, duration_secs);
            apply(state, TransportEvent::SourceReplaced);

            state.display.set_file(&path);
            state.status = format!("Loaded: {}", path.display());
        }
        PlayerEvent::LoadFailed { path, error } => {
            // Previous source, state and controls stay as they were.
            state.opening = false;
            state.pending_load = None;
            state.status = format!("Could not open {}: {error}", path.display());
        }
        PlayerEvent::TransportChanged { playing } => {
            apply(state, TransportEvent::TransportChanged { playing });
        }
        PlayerEvent::Position(position) => {
            state.position = position;
        }
        PlayerEvent::Error(err) => {
            // A pending load is still pending; it answers on its own.
            tracing::warn!("playback error: {err}");
            state.status = format!("Playback error: {err}");
        }
        PlayerEvent::EngineFailed(err) => engine_lost(state, &err),
    }
}
