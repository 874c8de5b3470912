//! core/error.rs
//! Error types for loading, playback and config.

use std::path::PathBuf;

use thiserror::Error;

/// Opening or decoding an audio file failed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("open failed: {0}")]
    Open(#[from] std::io::Error),

    #[error("format probe failed: {0}")]
    Probe(symphonia::core::errors::Error),

    #[error("no supported audio track found")]
    NoTrack,

    #[error("decoder init failed: {0}")]
    DecoderInit(symphonia::core::errors::Error),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("unsupported audio stream: {0}")]
    Unsupported(#[from] rodio::decoder::DecoderError),
}

/// The playback engine could not be brought up.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("failed to init default audio output: {0}")]
    Output(#[from] rodio::StreamError),

    #[error("playback engine is not running")]
    EngineGone,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available on this platform")]
    NoConfigDir,

    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
