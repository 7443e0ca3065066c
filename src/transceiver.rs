//! PS/2 transceiver.
//!
//! Arbitrates the bus with the peer once per scheduling tick: either sends
//! the oldest queued byte, follows the peer's request to send handshake or
//! clocks in a frame and hands it to the command interpreter.

pub mod state;

use embedded_hal::delay::DelayNs;
use log::{debug, trace, warn};

use crate::bridge::BridgeContext;
use crate::bus::io::PinIO;
use crate::bus::Bus;
use crate::device::keyboard::{CommandInterpreter, Response};
use crate::usb::HostReport;

use self::state::{step, Action, Inputs, ReceiveState};

/// Outcome of one transceiver tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickEvent {
    None,
    /// A byte was sent to the peer and removed from the queue.
    Sent(u8),
    /// A report for the USB host.
    Report(HostReport),
}

#[derive(Debug)]
pub struct Transceiver {
    state: ReceiveState,
    keyboard: CommandInterpreter,
}

impl Transceiver {
    pub fn new() -> Self {
        Self {
            state: ReceiveState::Idle,
            keyboard: CommandInterpreter::new(),
        }
    }

    pub fn state(&self) -> ReceiveState {
        self.state
    }

    pub fn keyboard(&self) -> &CommandInterpreter {
        &self.keyboard
    }

    /// Run one scheduling tick.
    pub fn tick<T: PinIO, D: DelayNs>(
        &mut self,
        context: &mut BridgeContext,
        bus: &mut Bus<T, D>,
        receive_enabled: bool,
    ) -> TickEvent {
        let inputs = Inputs {
            lines: bus.sample(),
            pending: context.queue.peek(),
            counters: context.counters,
            receive_enabled,
        };

        let (next, action) = step(self.state, &inputs, &context.config);

        if next != self.state {
            trace!("{:?} -> {:?}", self.state, next);
            self.state = next;
            context.counters.reset_state_entry();
        }

        match action {
            Action::None => TickEvent::None,
            Action::Transmit(byte) => {
                match bus.send_byte(byte, context.config.check_bus_per_bit) {
                    Ok(()) => {
                        trace!("sent {:#04x}", byte);
                        context.queue.pop_front();
                        context.counters.reset_last_send();
                        TickEvent::Sent(byte)
                    }
                    Err(e) => {
                        debug!("send of {:#04x} deferred: {}", byte, e);
                        TickEvent::None
                    }
                }
            }
            Action::Receive => {
                let response = match bus.recv_byte() {
                    Ok(data) => {
                        debug!("received {:#04x}", data);
                        self.keyboard.receive_data(data)
                    }
                    Err(e) => {
                        warn!("receive failed: {}", e);
                        self.keyboard.frame_error()
                    }
                };
                match apply(context, response) {
                    Some(report) => TickEvent::Report(report),
                    None => TickEvent::None,
                }
            }
            Action::TimedOut(phase) => {
                warn!("peer request to send timed out in {:?}", phase);
                TickEvent::None
            }
        }
    }
}

impl Default for Transceiver {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(context: &mut BridgeContext, response: Response) -> Option<HostReport> {
    if let Some(reply) = response.reply {
        if !context.queue.push(reply) {
            warn!("outbound queue full, dropped reply {:#04x}", reply);
        }
    }

    if let Some(guard) = response.guard {
        let ticks = context.config.guard_ticks(guard);
        context.counters.set_send_guard_target(ticks);
    }

    response.report
}
