//! core/overlay.rs
//! Playhead cursor placement and click-to-seek mapping.

use super::types::PlaybackPosition;

/// Horizontal cursor offset for `position` in a region `width` pixels wide.
/// `None` when there is no timeline to place it on.
pub fn cursor_x(position: PlaybackPosition, width: f32) -> Option<f32> {
    if !position.has_duration() {
        return None;
    }

    let ratio = position.position_secs / position.duration_secs;
    Some((ratio * width as f64) as f32)
}

/// Seek target (seconds) for a press at `offset_x` within `width`.
pub fn seek_target(offset_x: f32, width: f32, duration_secs: f64) -> Option<f64> {
    if duration_secs <= 0.0 || width <= 0.0 {
        return None;
    }

    let ratio = (offset_x / width).clamp(0.0, 1.0) as f64;
    Some(ratio * duration_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cursor_at_quarter() {
        let x = cursor_x(PlaybackPosition::new(2.5, 10.0), 600.0).unwrap();
        assert_relative_eq!(x, 150.0);
    }

    #[test]
    fn no_cursor_without_duration() {
        assert_eq!(cursor_x(PlaybackPosition::new(2.5, 0.0), 600.0), None);
        assert_eq!(cursor_x(PlaybackPosition::default(), 600.0), None);
    }

    #[test]
    fn press_in_middle_seeks_to_half() {
        let t = seek_target(300.0, 600.0, 10.0).unwrap();
        assert_relative_eq!(t, 5.0);
    }

    #[test]
    fn no_seek_without_duration() {
        assert_eq!(seek_target(300.0, 600.0, 0.0), None);
    }

    #[test]
    fn no_seek_in_zero_width() {
        assert_eq!(seek_target(0.0, 0.0, 10.0), None);
    }

    #[test]
    fn drag_past_edges_clamps() {
        assert_relative_eq!(seek_target(-40.0, 600.0, 10.0).unwrap(), 0.0);
        assert_relative_eq!(seek_target(900.0, 600.0, 10.0).unwrap(), 10.0);
    }
}
