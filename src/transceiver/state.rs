//! Bus arbitration as a pure transition function.

use crate::bus::raw::{Level, LineState};
use crate::config::Config;
use crate::timing::TimingCounters;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReceiveState {
    Idle,
    /// The peer pulled DATA, waiting for it to release CLOCK.
    StandbyReceive,
    /// Waiting for the start bit.
    Receiving,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub lines: LineState,
    /// Oldest queued byte.
    pub pending: Option<u8>,
    pub counters: TimingCounters,
    /// Whether a transmission from the peer may be started.
    pub receive_enabled: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// Send the byte. It stays queued if the send fails.
    Transmit(u8),
    /// Clock in a frame from the peer.
    Receive,
    /// The peer did not complete its request to send in time.
    TimedOut(ReceiveState),
}

pub fn step(state: ReceiveState, inputs: &Inputs, config: &Config) -> (ReceiveState, Action) {
    let since_state_entry = inputs.counters.since_state_entry();

    // The peer keeps its request pending and retries once receiving is
    // enabled again.
    if state != ReceiveState::Idle && !inputs.receive_enabled {
        return (ReceiveState::Idle, Action::None);
    }

    match state {
        ReceiveState::Idle => {
            if inputs.lines.data() == Level::Pulled {
                if inputs.receive_enabled {
                    return (ReceiveState::StandbyReceive, Action::None);
                }
                return (ReceiveState::Idle, Action::None);
            }

            match inputs.pending {
                Some(byte) if inputs.counters.guard_elapsed() && inputs.lines.bus_free() => {
                    (ReceiveState::Idle, Action::Transmit(byte))
                }
                _ => (ReceiveState::Idle, Action::None),
            }
        }
        ReceiveState::StandbyReceive => {
            if inputs.lines.clock() == Level::Released {
                (ReceiveState::Receiving, Action::None)
            } else if since_state_entry >= config.standby_timeout {
                (ReceiveState::Idle, Action::TimedOut(state))
            } else {
                (state, Action::None)
            }
        }
        ReceiveState::Receiving => {
            if inputs.lines.data() == Level::Pulled {
                (ReceiveState::Idle, Action::Receive)
            } else if since_state_entry >= config.receive_timeout {
                (ReceiveState::Idle, Action::TimedOut(state))
            } else {
                (state, Action::None)
            }
        }
    }
}
