//! core/mod.rs
//!
//! Everything that isn't drawing:
//! - transport state machine and playhead math (pure, unit tested)
//! - playback engine thread (rodio)
//! - waveform summaries: decode, accumulate, cache (symphonia)
//! - config + error types
//!
//! No Iced imports in here; the GUI calls in, never the other way round.

pub mod config;
pub mod decoder;
pub mod error;
pub mod overlay;
pub mod playback;
pub mod thumbnail;
pub mod transport;
pub mod types;
