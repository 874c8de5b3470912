//! GUI renderer (reads state, produces widgets; no mutation).

mod constants;
mod controls;
mod waveform;

use iced::Length;
use iced::widget::{Column, column};

use super::state::{Message, WaveThumb};
use constants::{PADDING, SPACING};

/// Window title: the loaded file's name, if any.
pub(crate) fn title(state: &WaveThumb) -> String {
    match state
        .source
        .as_ref()
        .and_then(|s| s.path.file_name())
        .map(|n| n.to_string_lossy())
    {
        Some(name) => format!("{name} - wavethumb"),
        None => "wavethumb".to_string(),
    }
}

pub(crate) fn view(state: &WaveThumb) -> Column<'_, Message> {
    let controls = controls::build_controls(state);
    let waveform = waveform::build_waveform(state);

    column![controls, waveform]
        .spacing(SPACING)
        .padding(PADDING)
        .height(Length::Fill)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AppConfig;
    use crate::core::types::SourceInfo;
    use std::path::PathBuf;

    #[test]
    fn title_names_loaded_file() {
        let mut state = WaveThumb::new(AppConfig::default());
        assert_eq!(title(&state), "wavethumb");

        state.source = Some(SourceInfo {
            path: PathBuf::from("/music/take1.wav"),
            duration_secs: 2.0,
        });
        assert_eq!(title(&state), "take1.wav - wavethumb");
    }
}
