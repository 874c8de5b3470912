//! gui/display.rs
//! Waveform display state: which file, what summary data we have so far,
//! and the cached geometry for the waveform layer.
//!
//! Summary data arrives from builder threads; `drain` marshals it into the
//! UI loop on each tick.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use iced::widget::canvas;

use crate::core::thumbnail::{CacheKey, ThumbnailCache, ThumbnailEvent, WaveformSummary, spawn_build};

pub(crate) struct WaveformDisplay {
    file: Option<PathBuf>,
    summary: Option<Arc<WaveformSummary>>,

    /// Bumped on every `set_file`; builder events from older files are dropped.
    generation: u64,
    cache_key: Option<CacheKey>,
    building: bool,

    samples_per_peak: usize,
    cache: ThumbnailCache,

    events_tx: Sender<ThumbnailEvent>,
    events_rx: Receiver<ThumbnailEvent>,

    /// Waveform layer; cleared whenever the summary changes.
    pub(crate) geometry: canvas::Cache,
}

impl WaveformDisplay {
    pub(crate) fn new(samples_per_peak: usize, cache_entries: usize) -> Self {
        let (events_tx, events_rx) = mpsc::channel();

        Self {
            file: None,
            summary: None,
            generation: 0,
            cache_key: None,
            building: false,
            samples_per_peak,
            cache: ThumbnailCache::new(cache_entries),
            events_tx,
            events_rx,
            geometry: canvas::Cache::new(),
        }
    }

    /// Replace the summary source with `path`.
    pub(crate) fn set_file(&mut self, path: &Path) {
        self.generation += 1;
        self.file = Some(path.to_path_buf());
        self.summary = None;
        self.geometry.clear();

        self.cache_key = match CacheKey::for_file(path) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::debug!("no cache key for {}: {e}", path.display());
                None
            }
        };

        if let Some(hit) = self.cache_key.as_ref().and_then(|k| self.cache.get(k)) {
            tracing::debug!("thumbnail cache hit: {}", path.display());
            self.summary = Some(hit);
            self.building = false;
            return;
        }

        self.building = true;
        spawn_build(
            path.to_path_buf(),
            self.samples_per_peak,
            self.generation,
            self.events_tx.clone(),
        );
    }

    /// Apply pending builder notifications. Returns true if the waveform
    /// needs repainting.
    pub(crate) fn drain(&mut self) -> bool {
        let mut changed = false;

        while let Ok(event) = self.events_rx.try_recv() {
            if event.generation() != self.generation {
                tracing::trace!("dropping stale thumbnail event (gen {})", event.generation());
                continue;
            }

            match event {
                ThumbnailEvent::Progress { summary, .. } => {
                    self.summary = Some(summary);
                    changed = true;
                }
                ThumbnailEvent::Finished { summary, .. } => {
                    if let Some(key) = self.cache_key.clone() {
                        self.cache.put(key, Arc::clone(&summary));
                        tracing::debug!("thumbnail cached ({} entries)", self.cache.len());
                    }
                    self.summary = Some(summary);
                    self.building = false;
                    changed = true;
                }
                ThumbnailEvent::Failed { error, .. } => {
                    // Keep whatever partial data already arrived.
                    tracing::warn!("thumbnail unavailable: {error}");
                    self.building = false;
                }
            }
        }

        if changed {
            self.geometry.clear();
        }
        changed
    }

    /// Some channel data exists to draw.
    pub(crate) fn has_data(&self) -> bool {
        self.summary.as_ref().is_some_and(|s| s.num_channels() > 0)
    }

    pub(crate) fn summary(&self) -> Option<&WaveformSummary> {
        self.summary.as_deref()
    }

    pub(crate) fn is_building(&self) -> bool {
        self.building
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn inject(&self, event: ThumbnailEvent) {
        self.events_tx.send(event).unwrap();
    }
}
