//! Transport buttons + status line.

use iced::widget::{Column, button, column, row, text};
use iced::{Alignment, Length};

use super::super::state::{Message, WaveThumb};
use super::constants::{BUTTON_H, SPACING, STATUS_TEXT};

fn fmt_secs(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Open / Play / Stop, stacked full width.
///
/// Enabled flags come from `WaveThumb::controls()`; a disabled button
/// simply has no `on_press`.
pub(crate) fn build_controls(state: &WaveThumb) -> Column<'_, Message> {
    let controls = state.controls();

    let open = button(text("Open..."))
        .width(Length::Fill)
        .height(Length::Fixed(BUTTON_H))
        .on_press_maybe((!state.opening).then_some(Message::OpenPressed));

    let play = button(text("Play"))
        .width(Length::Fill)
        .height(Length::Fixed(BUTTON_H))
        .style(button::success)
        .on_press_maybe(controls.play_enabled.then_some(Message::PlayPressed));

    let stop = button(text("Stop"))
        .width(Length::Fill)
        .height(Length::Fixed(BUTTON_H))
        .style(button::danger)
        .on_press_maybe(controls.stop_enabled.then_some(Message::StopPressed));

    let time_text = if state.position.has_duration() {
        format!(
            "{} / {}",
            fmt_secs(state.position.position_secs),
            fmt_secs(state.position.duration_secs)
        )
    } else {
        "-:-- / -:--".to_string()
    };

    let status = row![
        text(&state.status).size(STATUS_TEXT).width(Length::Fill),
        text(time_text).size(STATUS_TEXT),
    ]
    .spacing(SPACING)
    .align_y(Alignment::Center);

    column![open, play, stop, status].spacing(SPACING)
}
