//! core/thumbnail/builder.rs
//! Background summary builder.
//!
//! One thread per build. Partial summaries are published as blocks close so
//! the display can draw while decoding continues; every event carries the
//! generation it was started with so the receiver can drop stale ones.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use super::{PeakAccumulator, WaveformSummary};
use crate::core::decoder::ProbedStream;
use crate::core::error::LoadError;

/// New peaks between two progress notifications.
const PUBLISH_EVERY_PEAKS: usize = 256;

#[derive(Debug, Clone)]
pub enum ThumbnailEvent {
    Progress {
        generation: u64,
        summary: Arc<WaveformSummary>,
    },
    Finished {
        generation: u64,
        summary: Arc<WaveformSummary>,
    },
    Failed {
        generation: u64,
        error: String,
    },
}

impl ThumbnailEvent {
    pub fn generation(&self) -> u64 {
        match self {
            ThumbnailEvent::Progress { generation, .. }
            | ThumbnailEvent::Finished { generation, .. }
            | ThumbnailEvent::Failed { generation, .. } => *generation,
        }
    }
}

/// Start summarizing `path` on its own thread. Results go to `events`.
pub fn spawn_build(
    path: PathBuf,
    samples_per_peak: usize,
    generation: u64,
    events: Sender<ThumbnailEvent>,
) {
    thread::spawn(move || {
        tracing::debug!(generation, "thumbnail build started: {}", path.display());

        let result = build(&path, samples_per_peak, |summary| {
            // Receiver gone means the app is closing; keep going is harmless.
            let _ = events.send(ThumbnailEvent::Progress {
                generation,
                summary: Arc::new(summary),
            });
        });

        let event = match result {
            Ok(summary) => {
                tracing::debug!(
                    generation,
                    peaks = summary.channels.first().map_or(0, Vec::len),
                    "thumbnail build finished"
                );
                ThumbnailEvent::Finished {
                    generation,
                    summary: Arc::new(summary),
                }
            }
            Err(e) => {
                tracing::warn!(generation, "thumbnail build failed for {}: {e}", path.display());
                ThumbnailEvent::Failed {
                    generation,
                    error: e.to_string(),
                }
            }
        };
        let _ = events.send(event);
    });
}

/// Summarize the whole file synchronously, calling `on_progress` with
/// partial snapshots along the way.
pub fn build(
    path: &std::path::Path,
    samples_per_peak: usize,
    mut on_progress: impl FnMut(WaveformSummary),
) -> Result<WaveformSummary, LoadError> {
    let mut stream = ProbedStream::open(path)?;
    let mut chunk = Vec::new();

    // The channel count may only be known after the first packet.
    if !stream.next_chunk(&mut chunk)? {
        return Ok(PeakAccumulator::new(
            stream.channels(),
            samples_per_peak,
            stream.sample_rate(),
            stream.n_frames(),
        )
        .finish());
    }

    let mut acc = PeakAccumulator::new(
        stream.channels(),
        samples_per_peak,
        stream.sample_rate(),
        stream.n_frames(),
    );
    let mut published = 0;

    loop {
        acc.push_interleaved(&chunk);

        if acc.peaks_len() >= published + PUBLISH_EVERY_PEAKS {
            published = acc.peaks_len();
            on_progress(acc.snapshot());
        }

        if !stream.next_chunk(&mut chunk)? {
            break;
        }
    }

    Ok(acc.finish())
}
