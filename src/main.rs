//! wavethumb
//!
//! A small desktop app (built with `iced`) that opens a WAV file, draws its
//! waveform thumbnail, plays/stops it, and shows a moving playhead you can
//! click or drag to seek.
//!
//! # Layout
//! - `core`: transport state machine, playback engine thread, waveform
//!   summaries, config. No GUI code.
//! - `gui`: state, messages, update, view, subscription.
//!
//! # Concurrency model
//! - The iced update loop owns all UI state and never blocks.
//! - Playback runs on its own thread (commands in, events out).
//! - Each waveform summary is built on its own thread.
//! - Both send notifications over channels that the UI drains on a timer
//!   tick, so nothing from another thread touches UI state directly.

mod core;
mod gui;

use iced::Size;
use tracing_subscriber::EnvFilter;

use crate::core::config::AppConfig;
use crate::gui::WaveThumb;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wavethumb=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> iced::Result {
    init_tracing();

    let config = AppConfig::load();
    let window = Size::new(config.window_width, config.window_height);

    iced::application(move || WaveThumb::new(config.clone()), gui::update, gui::view)
        .title(gui::title)
        .subscription(gui::subscription)
        .window_size(window)
        .run()
}
