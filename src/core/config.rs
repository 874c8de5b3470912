//! core/config.rs
//! App configuration, stored as TOML in the platform config dir.
//!
//! Every field has a default, so a partial file (or none at all) is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Source frames summarized into one waveform peak.
    pub samples_per_peak: usize,

    /// Completed thumbnails kept in memory.
    pub thumbnail_cache_entries: usize,

    /// How often the playhead overlay polls position and repaints.
    pub overlay_interval_ms: u64,

    /// How often the engine reports position.
    pub engine_tick_ms: u64,

    /// Click/drag on the waveform seeks.
    pub scrub_enabled: bool,

    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            samples_per_peak: 512,
            thumbnail_cache_entries: 5,
            overlay_interval_ms: 40,
            engine_tick_ms: 20,
            scrub_enabled: true,
            window_width: 600.0,
            window_height: 400.0,
        }
    }
}

impl AppConfig {
    /// Load from the config dir, falling back to defaults on any failure.
    pub fn load() -> Self {
        let path = match config_path() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("{e}; using default config");
                return Self::default();
            }
        };

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("loaded config from {}", path.display());
                config
            }
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::debug!("no config at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("{e}; using default config");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        let config: Self = toml::from_str(contents)?;
        Ok(config.sanitized())
    }

    /// Zero intervals or sizes would stall the timers or the summarizer.
    fn sanitized(mut self) -> Self {
        self.samples_per_peak = self.samples_per_peak.max(1);
        self.thumbnail_cache_entries = self.thumbnail_cache_entries.max(1);
        self.overlay_interval_ms = self.overlay_interval_ms.max(1);
        self.engine_tick_ms = self.engine_tick_ms.max(1);
        self
    }
}

fn config_path() -> Result<PathBuf, ConfigError> {
    let dirs = directories::ProjectDirs::from("", "", "wavethumb").ok_or(ConfigError::NoConfigDir)?;
    Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config = AppConfig::parse("overlay_interval_ms = 16\nscrub_enabled = false\n").unwrap();
        assert_eq!(config.overlay_interval_ms, 16);
        assert!(!config.scrub_enabled);
        assert_eq!(config.samples_per_peak, 512);
        assert_eq!(config.thumbnail_cache_entries, 5);
    }

    #[test]
    fn zero_values_are_clamped() {
        let config = AppConfig::parse("samples_per_peak = 0\nengine_tick_ms = 0\n").unwrap();
        assert_eq!(config.samples_per_peak, 1);
        assert_eq!(config.engine_tick_ms, 1);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "samples_per_peak = \"lots\"").unwrap();

        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
