//! Protocol between the bridge and the USB host over the CDC serial channel.
//!
//! Host to bridge, one message per read:
//! * `'I'`: request a status report.
//! * `'S' <bytes...>`: bytes to send to the PS/2 peer.
//!
//! Bridge to host:
//! * status report: `PS2USB:0` followed by `'0'` or `'1'` (peripheral power),
//! * `[1, command]`: the PS/2 peer sent `command`,
//! * `[2, 0xED, indicators]`: the PS/2 peer set the status indicators.

use log::{debug, warn};

use crate::bridge::BridgeContext;
use crate::config::StatusFraming;
use crate::device::keyboard::raw::FromPeer;

/// Maximum length of one message from the host (CDC data endpoint size).
pub const MAX_MESSAGE_LEN: usize = 64;
/// Maximum length of an encoded report.
pub const MAX_REPORT_LEN: usize = 10;

pub const STATUS_PREFIX: &[u8; 8] = b"PS2USB:0";
pub const STATUS_REPORT_LEN: usize = 9;

pub const REQUEST_INFO: u8 = b'I';
pub const REQUEST_SEND: u8 = b'S';

/// Non-blocking serial byte stream to the USB host.
pub trait SerialIO {
    /// Copy pending bytes of at most one message into `buffer`. Returns the
    /// number of bytes copied, 0 if nothing is pending.
    fn receive_available(&mut self, buffer: &mut [u8]) -> usize;
    fn send(&mut self, bytes: &[u8]);

    /// `false` while the USB device is not configured or is suspended.
    fn ready(&mut self) -> bool {
        true
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HostCommand<'a> {
    Info,
    Send(&'a [u8]),
}

impl <'a> HostCommand<'a> {
    /// Returns `None` for an empty message or an unknown leading byte.
    pub fn parse(message: &'a [u8]) -> Option<Self> {
        let (&first, rest) = message.split_first()?;

        match first {
            REQUEST_INFO => Some(HostCommand::Info),
            REQUEST_SEND => Some(HostCommand::Send(rest)),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HostReport {
    Status { powered: bool },
    Command(u8),
    StatusIndicators(u8),
}

impl HostReport {
    pub fn encode<'a>(&self, framing: StatusFraming, buffer: &'a mut [u8; MAX_REPORT_LEN]) -> &'a [u8] {
        let len = match *self {
            HostReport::Status { powered } => {
                let start = match framing {
                    StatusFraming::Bare => 0,
                    StatusFraming::LengthPrefixed => {
                        buffer[0] = STATUS_REPORT_LEN as u8;
                        1
                    }
                };
                buffer[start..start + STATUS_PREFIX.len()].copy_from_slice(STATUS_PREFIX);
                buffer[start + STATUS_PREFIX.len()] = b'0' + powered as u8;
                start + STATUS_REPORT_LEN
            }
            HostReport::Command(command) => {
                buffer[..2].copy_from_slice(&[1, command]);
                2
            }
            HostReport::StatusIndicators(indicators) => {
                buffer[..3].copy_from_slice(&[2, FromPeer::SET_STATUS_INDICATORS, indicators]);
                3
            }
        };

        &buffer[..len]
    }
}

pub fn send_report<S: SerialIO>(serial: &mut S, report: HostReport, framing: StatusFraming) {
    let mut buffer = [0; MAX_REPORT_LEN];
    debug!("report to host: {:?}", report);
    serial.send(report.encode(framing, &mut buffer));
}

/// Last seen state of the peripheral power rail.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PowerStatus {
    powered: bool,
}

impl PowerStatus {
    pub fn new(powered: bool) -> Self {
        Self { powered }
    }

    pub fn powered(&self) -> bool {
        self.powered
    }

    /// Returns `true` if the state changed.
    pub fn update(&mut self, powered: bool) -> bool {
        let changed = self.powered != powered;
        self.powered = powered;
        changed
    }
}

/// Handle at most one host message and report power changes.
pub fn tick<S: SerialIO>(context: &mut BridgeContext, serial: &mut S, powered: bool) {
    let mut buffer = [0; MAX_MESSAGE_LEN];
    let len = serial.receive_available(&mut buffer).min(MAX_MESSAGE_LEN);

    let mut status_due = false;

    match HostCommand::parse(&buffer[..len]) {
        Some(HostCommand::Info) => status_due = true,
        Some(HostCommand::Send(bytes)) => {
            let accepted = context.queue.extend_from_slice(bytes);
            if accepted < bytes.len() {
                warn!("outbound queue full, dropped {} bytes", bytes.len() - accepted);
            }
            let guard = context.config.generic_guard;
            context.counters.set_send_guard_target(guard);
        }
        None if len > 0 => debug!("ignored host message starting with {:#04x}", buffer[0]),
        None => (),
    }

    if context.power.update(powered) {
        debug!("peripheral power changed to {}", powered);
        status_due = true;
    }

    if status_due {
        let report = HostReport::Status { powered: context.power.powered() };
        send_report(serial, report, context.config.status_framing);
    }
}
