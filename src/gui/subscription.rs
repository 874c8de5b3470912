//! gui/subscription.rs
//! Overlay timer: a periodic Tick that drains engine + thumbnail
//! notifications and repaints the playhead.

use iced::{Subscription, time};
use std::time::Duration;

use super::state::{Message, WaveThumb};

pub(crate) fn subscription(state: &WaveThumb) -> Subscription<Message> {
    if state.playback_events.is_none() && !state.display.is_building() {
        return Subscription::none();
    }

    time::every(Duration::from_millis(state.config.overlay_interval_ms)).map(|_| Message::Tick)
}
