//! gui/mod.rs
//!
//! This folder contains ONLY frontend concerns:
//! - app state ('WaveThumb')
//! - messages ('Message')
//! - update logic ('update()')
//! - view layout ('view()')
//! - subscriptions (overlay timer)
//! - waveform display state ('display')

pub(crate) mod display;
pub(crate) mod state;
pub(crate) mod subscription;
pub(crate) mod update;
pub(crate) mod view;

// Re-export the entry points main.rs needs.
pub(crate) use state::WaveThumb;
pub(crate) use subscription::subscription;
pub(crate) use update::update;
pub(crate) use view::{title, view};
