//! gui/update/mod.rs
//! Update logic (router).
//! Mutates state in response to `Message` events.

use iced::Task;

use super::state::{Message, WaveThumb};

mod open;
mod transport;

pub(crate) fn update(state: &mut WaveThumb, message: Message) -> Task<Message> {
    match message {
        Message::Tick => tick(state),

        Message::OpenPressed => open::open_pressed(state),
        Message::FileChosen(path) => open::file_chosen(state, path),

        Message::PlayPressed => transport::play(state),
        Message::StopPressed => transport::stop(state),
        Message::SeekRequested(secs) => transport::seek(state, secs),
    }
}

fn tick(state: &mut WaveThumb) -> Task<Message> {
    transport::drain_events(state);
    state.display.drain();
    Task::none()
}
