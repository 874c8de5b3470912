//! gui/update/open.rs
//! Open button: native file dialog, then hand the path to the engine.
//!
//! The engine answers with `Loaded` or `LoadFailed` (see transport.rs).

use std::path::PathBuf;

use iced::Task;

use super::super::state::{Message, WaveThumb};
use super::transport::{ensure_engine, send};
use crate::core::playback::PlayerCommand;

async fn pick_wav_file() -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Select a Wave file to play...")
        .add_filter("Wave", &["wav"])
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

pub(crate) fn open_pressed(state: &mut WaveThumb) -> Task<Message> {
    if state.opening {
        return Task::none();
    }

    state.opening = true;
    Task::perform(pick_wav_file(), Message::FileChosen)
}

pub(crate) fn file_chosen(state: &mut WaveThumb, path: Option<PathBuf>) -> Task<Message> {
    let Some(path) = path else {
        state.opening = false;
        return Task::none();
    };

    ensure_engine(state);

    tracing::info!("opening {}", path.display());
    state.status = format!("Loading {}…", path.display());
    state.pending_load = Some(path.clone());

    // On failure the engine is released and `opening` cleared.
    send(state, PlayerCommand::Load(path));

    Task::none()
}
