//! core/thumbnail/mod.rs
//! Waveform summaries ("thumbnails"): reduced min/max peaks per channel.
//!
//! - `PeakAccumulator` folds interleaved samples into peaks
//! - `builder` fills a summary on a background thread, publishing partial data
//! - `cache` keeps finished summaries keyed by file identity

pub mod builder;
pub mod cache;

pub use builder::{ThumbnailEvent, spawn_build};
pub use cache::{CacheKey, ThumbnailCache};

/// Min/max of a run of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub min: f32,
    pub max: f32,
}

impl Peak {
    fn merge(self, other: Peak) -> Peak {
        Peak {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveformSummary {
    /// One vector of peaks per channel, all the same length.
    pub channels: Vec<Vec<Peak>>,
    pub samples_per_peak: usize,
    pub sample_rate: u32,
    /// Frames folded in so far.
    pub frames_summarized: u64,
    /// Frame count the container announced, if any.
    pub expected_frames: Option<u64>,
    /// The whole stream has been summarized.
    pub complete: bool,
}

impl WaveformSummary {
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Length in seconds of the full stream (not just what's summarized yet).
    pub fn total_length(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        let frames = self.expected_frames.unwrap_or(self.frames_summarized);
        frames.max(self.frames_summarized) as f64 / self.sample_rate as f64
    }

    /// Resample one channel to `columns` pixel columns covering
    /// `start_secs..end_secs`, with peaks scaled by `vertical_zoom`.
    ///
    /// Columns with no summarized data yet are `None`.
    pub fn draw_channel(
        &self,
        channel: usize,
        start_secs: f64,
        end_secs: f64,
        columns: usize,
        vertical_zoom: f32,
    ) -> Vec<Option<Peak>> {
        let Some(peaks) = self.channels.get(channel) else {
            return vec![None; columns];
        };
        if columns == 0 || end_secs <= start_secs || self.samples_per_peak == 0 {
            return vec![None; columns];
        }

        let peaks_per_sec = self.sample_rate as f64 / self.samples_per_peak as f64;
        let span = end_secs - start_secs;

        (0..columns)
            .map(|col| {
                let t0 = start_secs + span * col as f64 / columns as f64;
                let t1 = start_secs + span * (col + 1) as f64 / columns as f64;

                // Nudge so exact block boundaries don't pick up a neighbour.
                let first = (t0 * peaks_per_sec + 1e-9).floor().max(0.0) as usize;
                let last = ((t1 * peaks_per_sec - 1e-9).ceil().max(0.0) as usize).max(first + 1);

                peaks
                    .get(first..last.min(peaks.len()))
                    .and_then(|run| run.iter().copied().reduce(Peak::merge))
                    .map(|p| Peak {
                        min: (p.min * vertical_zoom).clamp(-1.0, 1.0),
                        max: (p.max * vertical_zoom).clamp(-1.0, 1.0),
                    })
            })
            .collect()
    }
}

/// Folds interleaved samples into a `WaveformSummary`, one peak per
/// `samples_per_peak` frames. The trailing partial block is kept open until
/// `finish`.
#[derive(Debug)]
pub struct PeakAccumulator {
    summary: WaveformSummary,
    open: Vec<Peak>,
    frames_in_open: usize,
}

impl PeakAccumulator {
    pub fn new(
        channels: usize,
        samples_per_peak: usize,
        sample_rate: u32,
        expected_frames: Option<u64>,
    ) -> Self {
        Self {
            summary: WaveformSummary {
                channels: vec![Vec::new(); channels],
                samples_per_peak: samples_per_peak.max(1),
                sample_rate,
                frames_summarized: 0,
                expected_frames,
                complete: false,
            },
            open: Vec::new(),
            frames_in_open: 0,
        }
    }

    pub fn peaks_len(&self) -> usize {
        self.summary.channels.first().map_or(0, Vec::len)
    }

    pub fn push_interleaved(&mut self, samples: &[f32]) {
        let channels = self.summary.channels.len();
        if channels == 0 {
            return;
        }

        for frame in samples.chunks_exact(channels) {
            if self.frames_in_open == 0 {
                self.open = frame.iter().map(|&s| Peak { min: s, max: s }).collect();
            } else {
                for (peak, &s) in self.open.iter_mut().zip(frame) {
                    peak.min = peak.min.min(s);
                    peak.max = peak.max.max(s);
                }
            }

            self.frames_in_open += 1;
            self.summary.frames_summarized += 1;

            if self.frames_in_open == self.summary.samples_per_peak {
                self.close_block();
            }
        }
    }

    fn close_block(&mut self) {
        for (lane, peak) in self.summary.channels.iter_mut().zip(self.open.drain(..)) {
            lane.push(peak);
        }
        self.frames_in_open = 0;
    }

    /// Copy of what has been summarized so far (closed blocks only).
    pub fn snapshot(&self) -> WaveformSummary {
        self.summary.clone()
    }

    pub fn finish(mut self) -> WaveformSummary {
        if self.frames_in_open > 0 {
            self.close_block();
        }
        self.summary.complete = true;
        self.summary
    }
}
