//! core/thumbnail/cache.rs
//! LRU memory cache of finished waveform summaries.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use lru::LruCache;

use super::WaveformSummary;

/// Identity of a file's contents, as far as the filesystem tells us.
/// A rewritten file gets a new key even at the same path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    path: PathBuf,
    len: u64,
    modified: Option<SystemTime>,
}

impl CacheKey {
    pub fn for_file(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

pub struct ThumbnailCache {
    entries: LruCache<CacheKey, Arc<WaveformSummary>>,
}

impl ThumbnailCache {
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<WaveformSummary>> {
        self.entries.get(key).cloned()
    }

    /// Only complete summaries are worth keeping.
    pub fn put(&mut self, key: CacheKey, summary: Arc<WaveformSummary>) {
        if !summary.complete {
            return;
        }
        self.entries.put(key, summary);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
