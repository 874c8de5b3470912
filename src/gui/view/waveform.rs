//! Waveform canvas: cached thumbnail layer + playhead overlay, with
//! click/drag to seek.

use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Program, Stroke};
use iced::widget::{Canvas, container, text};
use iced::{Element, Length, Point, Rectangle, Size, Theme, mouse};

use super::super::display::WaveformDisplay;
use super::super::state::{Message, WaveThumb};
use super::constants::{LANE_GAP, PLAYHEAD, PLAYHEAD_W, VERTICAL_ZOOM, WAVEFORM_BG, WAVEFORM_FG};
use crate::core::overlay;
use crate::core::thumbnail::WaveformSummary;
use crate::core::types::PlaybackPosition;

/// Placeholder when there's nothing to draw, canvas otherwise.
pub(crate) fn build_waveform(state: &WaveThumb) -> Element<'_, Message> {
    if !state.display.has_data() {
        let label = match state.display.file() {
            Some(path) if state.display.is_building() => {
                format!("Reading {}...", path.display())
            }
            _ => "No File Loaded".to_string(),
        };
        return container(text(label))
            .style(container::bordered_box)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
    }

    Canvas::new(WaveformCanvas {
        display: &state.display,
        position: state.position,
        scrub_enabled: state.config.scrub_enabled,
        on_seek: Message::SeekRequested,
    })
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

/// Drag state for scrubbing.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ScrubInteraction {
    dragging: bool,
}

pub(crate) struct WaveformCanvas<'a, F>
where
    F: Fn(f64) -> Message,
{
    display: &'a WaveformDisplay,
    position: PlaybackPosition,
    scrub_enabled: bool,
    on_seek: F,
}

impl<F> WaveformCanvas<'_, F>
where
    F: Fn(f64) -> Message,
{
    fn seek_to(&self, x: f32, width: f32) -> Option<canvas::Action<Message>> {
        overlay::seek_target(x, width, self.position.duration_secs)
            .map(|secs| canvas::Action::publish((self.on_seek)(secs)))
    }
}

impl<F> Program<Message> for WaveformCanvas<'_, F>
where
    F: Fn(f64) -> Message,
{
    type State = ScrubInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        if !self.scrub_enabled {
            return None;
        }

        if let Some(p) = cursor.position_in(bounds) {
            match event {
                Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                    interaction.dragging = true;
                    return self.seek_to(p.x, bounds.width);
                }
                Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                    interaction.dragging = false;
                }
                Event::Mouse(mouse::Event::CursorMoved { .. }) if interaction.dragging => {
                    return self.seek_to(p.x, bounds.width);
                }
                _ => {}
            }
        } else if matches!(event, Event::Mouse(mouse::Event::ButtonReleased(_))) {
            interaction.dragging = false;
        }

        None
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.scrub_enabled && self.position.has_duration() && cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let waveform = self.display.geometry.draw(renderer, bounds.size(), |frame| {
            frame.fill_rectangle(Point::ORIGIN, frame.size(), WAVEFORM_BG);
            if let Some(summary) = self.display.summary() {
                draw_channels(frame, summary);
            }
        });

        let mut playhead = Frame::new(renderer, bounds.size());
        if let Some(x) = overlay::cursor_x(self.position, bounds.width) {
            playhead.stroke(
                &Path::line(Point::new(x, 0.0), Point::new(x, bounds.height)),
                Stroke::default().with_color(PLAYHEAD).with_width(PLAYHEAD_W),
            );
        }

        vec![waveform, playhead.into_geometry()]
    }
}

/// All channels, one lane each, full length across the frame width.
fn draw_channels(frame: &mut Frame, summary: &WaveformSummary) {
    let n = summary.num_channels();
    if n == 0 {
        return;
    }

    let size = frame.size();
    let columns = size.width.max(0.0) as usize;
    let lane_h = ((size.height - LANE_GAP * (n - 1) as f32) / n as f32).max(1.0);
    let half = lane_h / 2.0;
    let end = summary.total_length();

    for ch in 0..n {
        let mid = ch as f32 * (lane_h + LANE_GAP) + half;

        for (x, peak) in summary
            .draw_channel(ch, 0.0, end, columns, VERTICAL_ZOOM)
            .into_iter()
            .enumerate()
        {
            let Some(peak) = peak else { continue };
            let top = mid - peak.max * half;
            let bottom = mid - peak.min * half;
            frame.fill_rectangle(
                Point::new(x as f32, top),
                Size::new(1.0, (bottom - top).max(1.0)),
                WAVEFORM_FG,
            );
        }
    }
}
