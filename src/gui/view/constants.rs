//! View constants (layout/sizing/colours).

use iced::Color;

pub(crate) const PADDING: f32 = 10.0;
pub(crate) const SPACING: f32 = 10.0;

pub(crate) const BUTTON_H: f32 = 28.0;
pub(crate) const STATUS_TEXT: f32 = 13.0;

pub(crate) const WAVEFORM_BG: Color = Color::WHITE;
pub(crate) const WAVEFORM_FG: Color = Color::from_rgb(0.85, 0.1, 0.1);
pub(crate) const PLAYHEAD: Color = Color::from_rgb(0.1, 0.7, 0.2);
pub(crate) const PLAYHEAD_W: f32 = 2.0;

/// Gap between channel lanes.
pub(crate) const LANE_GAP: f32 = 4.0;
pub(crate) const VERTICAL_ZOOM: f32 = 1.0;
