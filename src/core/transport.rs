//! core/transport.rs
//! Play/stop state machine.
//!
//! The table (`next_state`) decides where an event leads; `change_state`
//! applies a target state and returns the one command that entering it
//! requires. Button enablement is derived from the current state.
//! No Iced imports, no engine handle: the caller runs the returned effect.

use super::types::Controls;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Starting,
    Playing,
    Stopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// User pressed Play.
    PlayRequested,
    /// User pressed Stop.
    StopRequested,
    /// The engine reports whether it is now producing audio.
    TransportChanged { playing: bool },
    /// A new file was installed as the loaded source.
    SourceReplaced,
}

/// Command the caller must send to the transport after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Start,
    Stop,
    /// Seek back to 0.0.
    Rewind,
}

/// Transition table. `None` means the event is ignored in `state`.
pub fn next_state(
    state: TransportState,
    event: TransportEvent,
    source_loaded: bool,
) -> Option<TransportState> {
    use TransportEvent as E;
    use TransportState as S;

    match (state, event) {
        (S::Stopped, E::PlayRequested) if source_loaded => Some(S::Starting),
        (_, E::PlayRequested) => None,

        (S::Playing, E::StopRequested) => Some(S::Stopping),
        (_, E::StopRequested) => None,

        (_, E::TransportChanged { playing: true }) => Some(S::Playing),
        (_, E::TransportChanged { playing: false }) => Some(S::Stopped),

        (_, E::SourceReplaced) => Some(S::Stopped),
    }
}

fn entry_effect(state: TransportState) -> Option<Effect> {
    match state {
        TransportState::Stopped => Some(Effect::Rewind),
        TransportState::Starting => Some(Effect::Start),
        TransportState::Playing => None,
        TransportState::Stopping => Some(Effect::Stop),
    }
}

#[derive(Debug, Default)]
pub struct TransportMachine {
    state: TransportState,
}

impl TransportMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Enter `target`. Re-entering the current state does nothing.
    pub fn change_state(&mut self, target: TransportState) -> Option<Effect> {
        if self.state == target {
            return None;
        }

        tracing::debug!("transport {:?} -> {:?}", self.state, target);
        self.state = target;
        entry_effect(target)
    }

    /// Run `event` through the table and apply the result, if any.
    pub fn handle(&mut self, event: TransportEvent, source_loaded: bool) -> Option<Effect> {
        let target = next_state(self.state, event, source_loaded)?;
        self.change_state(target)
    }

    pub fn controls(&self, source_loaded: bool) -> Controls {
        Controls {
            play_enabled: source_loaded && self.state != TransportState::Starting,
            stop_enabled: self.state == TransportState::Playing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TransportState::*;

    const ALL: [TransportState; 4] = [Stopped, Starting, Playing, Stopping];

    #[test]
    fn change_state_twice_is_same_as_once() {
        for from in ALL {
            for target in ALL {
                let mut once = TransportMachine { state: from };
                once.change_state(target);

                let mut twice = TransportMachine { state: from };
                twice.change_state(target);
                let second = twice.change_state(target);

                assert_eq!(once.state(), twice.state());
                assert_eq!(second, None, "{from:?} -> {target:?} twice");
            }
        }
    }

    #[test]
    fn entry_effects() {
        let mut m = TransportMachine::new();
        assert_eq!(m.change_state(Starting), Some(Effect::Start));
        assert_eq!(m.change_state(Playing), None);
        assert_eq!(m.change_state(Stopping), Some(Effect::Stop));
        assert_eq!(m.change_state(Stopped), Some(Effect::Rewind));
    }

    #[test]
    fn play_needs_a_source() {
        let mut m = TransportMachine::new();
        assert_eq!(m.handle(TransportEvent::PlayRequested, false), None);
        assert_eq!(m.state(), Stopped);

        assert_eq!(m.handle(TransportEvent::PlayRequested, true), Some(Effect::Start));
        assert_eq!(m.state(), Starting);
    }

    #[test]
    fn stop_only_from_playing() {
        for from in [Stopped, Starting, Stopping] {
            let mut m = TransportMachine { state: from };
            assert_eq!(m.handle(TransportEvent::StopRequested, true), None);
            assert_eq!(m.state(), from);
        }
    }

    #[test]
    fn controls_across_full_cycle() {
        let mut m = TransportMachine::new();
        let mut seen = Vec::new();

        seen.push((m.state(), m.controls(true)));
        m.handle(TransportEvent::PlayRequested, true);
        seen.push((m.state(), m.controls(true)));
        m.handle(TransportEvent::TransportChanged { playing: true }, true);
        seen.push((m.state(), m.controls(true)));
        m.handle(TransportEvent::StopRequested, true);
        seen.push((m.state(), m.controls(true)));
        m.handle(TransportEvent::TransportChanged { playing: false }, true);
        seen.push((m.state(), m.controls(true)));

        let states: Vec<_> = seen.iter().map(|(s, _)| *s).collect();
        assert_eq!(states, vec![Stopped, Starting, Playing, Stopping, Stopped]);

        for (state, controls) in seen {
            assert_eq!(controls.play_enabled, state != Starting, "{state:?}");
            assert_eq!(controls.stop_enabled, state == Playing, "{state:?}");
        }
    }

    #[test]
    fn play_disabled_without_source_in_every_state() {
        for state in ALL {
            let m = TransportMachine { state };
            assert!(!m.controls(false).play_enabled);
        }
    }

    #[test]
    fn end_of_stream_while_playing_rewinds() {
        let mut m = TransportMachine { state: Playing };
        let effect = m.handle(TransportEvent::TransportChanged { playing: false }, true);
        assert_eq!(effect, Some(Effect::Rewind));
        assert_eq!(m.state(), Stopped);
    }

    #[test]
    fn replacing_source_while_playing_stops() {
        let mut m = TransportMachine { state: Playing };
        assert_eq!(m.handle(TransportEvent::SourceReplaced, true), Some(Effect::Rewind));
        assert_eq!(m.state(), Stopped);

        // Already stopped: nothing to do.
        assert_eq!(m.handle(TransportEvent::SourceReplaced, true), None);
    }
}
