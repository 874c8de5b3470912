//! core/playback/engine.rs
//! Playback engine (rodio owner).
//!
//! Owns:
//! - OutputStream (must stay alive)
//! - the loaded source: one Sink fed by a decoder for the current file
//! - command loop + periodic position ticks
//!
//! Emits PlayerEvent back via a channel.
//! No Iced imports.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::{PlayerCommand, PlayerEvent};
use crate::core::decoder::probe_duration;
use crate::core::error::{LoadError, PlaybackError};
use crate::core::types::PlaybackPosition;

pub struct PlaybackEngine {
    // Keep this alive for the lifetime of the engine!
    // `None` only when something else pulls the mixer.
    _stream: Option<OutputStream>,
    mixer: Mixer,

    source: Option<LoadedSource>,
    playing: bool,
    last_reported: Option<PlaybackPosition>,

    tick: Duration,
    event_tx: Sender<PlayerEvent>,
}

/// The decoded stream for the current file, paused until started.
struct LoadedSource {
    path: PathBuf,
    sink: Sink,
    duration_secs: f64,
}

impl LoadedSource {
    fn open(mixer: &Mixer, path: PathBuf) -> Result<Self, LoadError> {
        let decoder = open_decoder(&path)?;

        let duration_secs = match decoder.total_duration() {
            Some(d) => d.as_secs_f64(),
            None => probe_duration(&path)?.unwrap_or(0.0),
        };

        let sink = Sink::connect_new(mixer);
        sink.pause();
        sink.append(decoder);

        Ok(Self {
            path,
            sink,
            duration_secs,
        })
    }

    /// The sink drained: queue a fresh decoder so the file can play again.
    fn rearm(&self) -> Result<(), LoadError> {
        let decoder = open_decoder(&self.path)?;
        self.sink.pause();
        self.sink.append(decoder);
        Ok(())
    }

    fn position(&self) -> PlaybackPosition {
        let pos = self.sink.get_pos().as_secs_f64();
        let pos = if self.duration_secs > 0.0 {
            pos.min(self.duration_secs)
        } else {
            pos
        };
        PlaybackPosition::new(pos, self.duration_secs)
    }
}

/// Seek target inside `0..=duration_secs`, or `None` when there's no
/// usable timeline.
fn clamp_seek(secs: f64, duration_secs: f64) -> Option<f64> {
    if !secs.is_finite() || !duration_secs.is_finite() || duration_secs <= 0.0 {
        return None;
    }
    Some(secs.clamp(0.0, duration_secs))
}

/// From a `File` so rodio knows the byte length; without it seeks fail.
fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, LoadError> {
    let file = File::open(path)?;
    Ok(Decoder::try_from(file)?)
}

impl PlaybackEngine {
    pub fn new(event_tx: Sender<PlayerEvent>, tick: Duration) -> Result<Self, PlaybackError> {
        let stream = OutputStreamBuilder::open_default_stream()?;
        let mixer = stream.mixer().clone();

        Ok(Self::with_mixer(Some(stream), mixer, event_tx, tick))
    }

    fn with_mixer(
        stream: Option<OutputStream>,
        mixer: Mixer,
        event_tx: Sender<PlayerEvent>,
        tick: Duration,
    ) -> Self {
        Self {
            _stream: stream,
            mixer,
            source: None,
            playing: false,
            last_reported: None,
            tick,
            event_tx,
        }
    }

    pub fn run(&mut self, command_rx: Receiver<PlayerCommand>) {
        loop {
            match command_rx.recv_timeout(self.tick) {
                Ok(cmd) => {
                    if self.handle_command(cmd) {
                        break;
                    }
                    while let Ok(cmd) = command_rx.try_recv() {
                        if self.handle_command(cmd) {
                            self.release();
                            return;
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            self.tick();
        }

        self.release();
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Returns true when the loop should exit.
    fn handle_command(&mut self, cmd: PlayerCommand) -> bool {
        tracing::debug!("engine command {cmd:?}");

        match cmd {
            PlayerCommand::Load(path) => self.load(path),
            PlayerCommand::Start => self.start(),
            PlayerCommand::Stop => self.stop(),
            PlayerCommand::Seek(secs) => self.seek(secs),
            PlayerCommand::Shutdown => return true,
        }

        false
    }

    fn load(&mut self, path: PathBuf) {
        match LoadedSource::open(&self.mixer, path.clone()) {
            Ok(next) => {
                let duration_secs = next.duration_secs;

                // New source goes in before the old one is released.
                let previous = self.source.replace(next);
                if let Some(old) = previous {
                    old.sink.stop();
                    tracing::debug!("released {}", old.path.display());
                }
                self.playing = false;
                self.last_reported = None;

                tracing::info!("loaded {} ({duration_secs:.2}s)", path.display());
                self.emit(PlayerEvent::Loaded {
                    path,
                    duration_secs,
                });
            }
            Err(e) => {
                tracing::warn!("could not load {}: {e}", path.display());
                self.emit(PlayerEvent::LoadFailed {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    fn start(&mut self) {
        let Some(src) = &self.source else {
            // Nothing loaded: the mixer keeps outputting silence.
            tracing::debug!("start ignored: no source loaded");
            return;
        };

        src.sink.play();
        self.playing = true;
        self.emit(PlayerEvent::TransportChanged { playing: true });
    }

    fn stop(&mut self) {
        let Some(src) = &self.source else {
            return;
        };

        src.sink.pause();
        self.playing = false;
        self.emit(PlayerEvent::TransportChanged { playing: false });
    }

    fn seek(&mut self, secs: f64) {
        let Some(src) = &self.source else {
            return;
        };
        let Some(target) = clamp_seek(secs, src.duration_secs) else {
            tracing::debug!("seek ignored: no usable duration");
            return;
        };

        if let Err(e) = src.sink.try_seek(Duration::from_secs_f64(target)) {
            self.emit(PlayerEvent::Error(format!("Seek failed: {e}")));
        }
    }

    fn tick(&mut self) {
        let Some(src) = &self.source else {
            return;
        };

        if self.playing && src.sink.empty() {
            tracing::debug!("end of stream: {}", src.path.display());
            if let Err(e) = src.rearm() {
                self.emit(PlayerEvent::Error(format!("Reload after end failed: {e}")));
            }
            self.playing = false;
            self.emit(PlayerEvent::TransportChanged { playing: false });
        }

        let Some(src) = &self.source else {
            return;
        };
        let position = src.position();
        if self.last_reported != Some(position) {
            self.last_reported = Some(position);
            self.emit(PlayerEvent::Position(position));
        }
    }

    fn release(&mut self) {
        if let Some(src) = self.source.take() {
            src.sink.stop();
        }
        self.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decoder::test_support::write_wav;
    use approx::assert_relative_eq;
    use rodio::mixer::{self, MixerSource};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::thread::{self, JoinHandle};
    use std::time::Instant;

    const RATE: u32 = 8_000;

    /// Pulls the mixer the way an output device would, only as fast as it can.
    struct FakeDevice {
        running: Arc<AtomicBool>,
        handle: Option<JoinHandle<()>>,
    }

    impl FakeDevice {
        fn start(mut output: MixerSource) -> Self {
            let running = Arc::new(AtomicBool::new(true));
            let flag = Arc::clone(&running);
            let handle = thread::spawn(move || {
                while flag.load(Ordering::Relaxed) {
                    for _ in 0..512 {
                        let _ = output.next();
                    }
                    thread::yield_now();
                }
            });

            Self {
                running,
                handle: Some(handle),
            }
        }
    }

    impl Drop for FakeDevice {
        fn drop(&mut self) {
            self.running.store(false, Ordering::Relaxed);
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        }
    }

    fn engine() -> (PlaybackEngine, Receiver<PlayerEvent>, MixerSource) {
        let (mixer, output) = mixer::mixer(1, RATE);
        let (tx, rx) = mpsc::channel();
        let engine = PlaybackEngine::with_mixer(None, mixer, tx, Duration::from_millis(20));
        (engine, rx, output)
    }

    fn fixture(dir: &Path, name: &str, frames: u32) -> PathBuf {
        write_wav(dir, name, RATE, 1, frames, |f, _| if f % 2 == 0 { 0.3 } else { -0.3 })
    }

    fn loaded_path(engine: &PlaybackEngine) -> Option<PathBuf> {
        engine.source.as_ref().map(|s| s.path.clone())
    }

    #[test]
    fn clamp_seek_bounds_and_rejects_bad_timelines() {
        assert_eq!(clamp_seek(12.0, 10.0), Some(10.0));
        assert_eq!(clamp_seek(-1.0, 10.0), Some(0.0));
        assert_eq!(clamp_seek(4.0, 10.0), Some(4.0));
        assert_eq!(clamp_seek(4.0, 0.0), None);
        assert_eq!(clamp_seek(f64::NAN, 10.0), None);
        assert_eq!(clamp_seek(1.0, f64::INFINITY), None);
    }

    #[test]
    fn opened_source_is_paused_at_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path(), "one.wav", RATE);
        let (mixer, _output) = mixer::mixer(1, RATE);

        let src = LoadedSource::open(&mixer, path).unwrap();

        assert_relative_eq!(src.duration_secs, 1.0, epsilon = 1e-3);
        assert!(src.sink.is_paused());
        assert_eq!(src.sink.len(), 1);
        assert_eq!(src.position(), PlaybackPosition::new(0.0, src.duration_secs));
    }

    #[test]
    fn rearm_queues_a_fresh_paused_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path(), "one.wav", RATE);
        let (mixer, _output) = mixer::mixer(1, RATE);

        let src = LoadedSource::open(&mixer, path).unwrap();
        src.sink.play();
        src.rearm().unwrap();

        assert!(src.sink.is_paused());
        assert_eq!(src.sink.len(), 2);
    }

    #[test]
    fn open_rejects_non_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.wav");
        std::fs::write(&path, b"not a riff header at all").unwrap();
        let (mixer, _output) = mixer::mixer(1, RATE);

        assert!(LoadedSource::open(&mixer, path).is_err());
    }

    #[test]
    fn start_without_source_is_a_no_op() {
        let (mut engine, events, _output) = engine();

        engine.handle_command(PlayerCommand::Start);
        engine.handle_command(PlayerCommand::Seek(1.0));
        engine.tick();

        assert!(!engine.playing);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn load_reports_duration_and_replaces_previous_source() {
        let dir = tempfile::tempdir().unwrap();
        let a = fixture(dir.path(), "a.wav", RATE);
        let b = fixture(dir.path(), "b.wav", RATE / 2);
        let (mut engine, events, _output) = engine();

        engine.handle_command(PlayerCommand::Load(a));
        engine.handle_command(PlayerCommand::Load(b.clone()));

        let durations: Vec<f64> = events
            .try_iter()
            .filter_map(|ev| match ev {
                PlayerEvent::Loaded { duration_secs, .. } => Some(duration_secs),
                _ => None,
            })
            .collect();
        assert_eq!(durations.len(), 2);
        assert_relative_eq!(durations[1], 0.5, epsilon = 1e-3);
        assert_eq!(loaded_path(&engine), Some(b));
    }

    #[test]
    fn failed_load_keeps_previous_source() {
        let dir = tempfile::tempdir().unwrap();
        let good = fixture(dir.path(), "good.wav", RATE);
        let (mut engine, events, _output) = engine();

        engine.handle_command(PlayerCommand::Load(good.clone()));
        engine.handle_command(PlayerCommand::Load(dir.path().join("missing.wav")));

        let last = events.try_iter().last().unwrap();
        assert!(matches!(last, PlayerEvent::LoadFailed { .. }));
        assert_eq!(loaded_path(&engine), Some(good));
    }

    #[test]
    fn first_tick_reports_rewound_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path(), "one.wav", RATE);
        let (mut engine, events, _output) = engine();

        engine.handle_command(PlayerCommand::Load(path));
        engine.tick();
        engine.tick();

        let positions: Vec<PlaybackPosition> = events
            .try_iter()
            .filter_map(|ev| match ev {
                PlayerEvent::Position(p) => Some(p),
                _ => None,
            })
            .collect();
        // Unchanged positions are not reported twice.
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].position_secs, 0.0);
        assert_relative_eq!(positions[0].duration_secs, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn seek_moves_paused_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path(), "one.wav", RATE);
        let (mut engine, events, output) = engine();
        let _device = FakeDevice::start(output);

        engine.handle_command(PlayerCommand::Load(path));
        engine.handle_command(PlayerCommand::Seek(0.5));
        engine.tick();

        let position = events
            .try_iter()
            .filter_map(|ev| match ev {
                PlayerEvent::Position(p) => Some(p),
                _ => None,
            })
            .last()
            .unwrap();
        assert_relative_eq!(position.position_secs, 0.5, epsilon = 0.01);
    }

    #[test]
    fn end_of_stream_rearms_and_reports_stopped() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path(), "blip.wav", RATE / 10);
        let (mut engine, events, output) = engine();

        engine.handle_command(PlayerCommand::Load(path));
        engine.handle_command(PlayerCommand::Start);
        assert!(engine.playing);

        let _device = FakeDevice::start(output);
        let deadline = Instant::now() + Duration::from_secs(5);
        while engine.source.as_ref().is_some_and(|s| !s.sink.empty()) {
            assert!(Instant::now() < deadline, "source never drained");
            thread::sleep(Duration::from_millis(5));
        }

        let _: Vec<PlayerEvent> = events.try_iter().collect();
        engine.tick();

        assert!(!engine.playing);
        let transport: Vec<bool> = events
            .try_iter()
            .filter_map(|ev| match ev {
                PlayerEvent::TransportChanged { playing } => Some(playing),
                _ => None,
            })
            .collect();
        assert_eq!(transport, vec![false]);

        let src = engine.source.as_ref().unwrap();
        assert_eq!(src.sink.len(), 1);
        assert!(src.sink.is_paused());
    }
}
