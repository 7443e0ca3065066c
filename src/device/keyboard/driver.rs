
use log::debug;

use super::raw::{FromPeer, StatusIndicators, ToPeer};
use crate::timing::Guard;
use crate::usb::HostReport;

/// What to do after the PS/2 peer sent a byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Response {
    /// Byte to queue for the peer.
    pub reply: Option<u8>,
    /// Report to send to the USB host.
    pub report: Option<HostReport>,
    /// New minimum delay before the next send.
    pub guard: Option<Guard>,
}

impl Response {
    fn reply(reply: u8) -> Self {
        Self { reply: Some(reply), ..Self::default() }
    }

    fn report(mut self, report: HostReport) -> Self {
        self.report = Some(report);
        self
    }

    fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    WaitCommand,
    WaitStatusIndicators,
}

/// Keyboard side of the PS/2 command protocol.
#[derive(Debug)]
pub struct CommandInterpreter {
    state: State,
    last_response: u8,
}

impl CommandInterpreter {
    pub fn new() -> Self {
        Self {
            state: State::WaitCommand,
            last_response: ToPeer::BAT_COMPLETION_CODE,
        }
    }

    /// `true` if the next byte is the argument of a set status indicators
    /// command.
    pub fn status_indicators_pending(&self) -> bool {
        self.state == State::WaitStatusIndicators
    }

    /// Last response byte, repeated when the peer requests a resend.
    pub fn last_response(&self) -> u8 {
        self.last_response
    }

    pub fn receive_data(&mut self, new_data: u8) -> Response {
        match self.state {
            State::WaitCommand => self.receive_command(new_data),
            State::WaitStatusIndicators => {
                self.state = State::WaitCommand;
                debug!("status indicators {:?}", StatusIndicators::from_bits_truncate(new_data));

                self.respond(ToPeer::ACK)
                    .report(HostReport::StatusIndicators(new_data))
                    .guard(Guard::Short)
            }
        }
    }

    /// Response to a frame which failed the parity or stop bit check.
    pub fn frame_error(&mut self) -> Response {
        Response::reply(ToPeer::RESEND).report(HostReport::Command(FromPeer::RESEND))
    }

    fn receive_command(&mut self, command: u8) -> Response {
        match command {
            FromPeer::RESET => {
                self.respond(ToPeer::BAT_COMPLETION_CODE)
                    .report(HostReport::Command(command))
                    .guard(Guard::Generic)
            }
            FromPeer::ECHO => self.respond(ToPeer::ECHO),
            FromPeer::SET_STATUS_INDICATORS => {
                self.state = State::WaitStatusIndicators;
                self.respond(ToPeer::ACK).guard(Guard::Short)
            }
            FromPeer::READ_ID => {
                self.respond(ToPeer::ACK)
                    .report(HostReport::Command(command))
                    .guard(Guard::Short)
            }
            FromPeer::RESEND => {
                Response::reply(self.last_response).report(HostReport::Command(command))
            }
            _ => {
                debug!("ignored command {:#04x}", command);
                Response::default()
            }
        }
    }

    fn respond(&mut self, reply: u8) -> Response {
        self.last_response = reply;
        Response::reply(reply)
    }
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new()
    }
}
