
//! PS/2 keyboard to USB serial bridge.
//!
//! The bridge emulates the keyboard side of a PS/2 link on a microcontroller
//! and relays traffic to a USB host over a CDC serial channel. The PS/2 bus is
//! bit-banged with busy-wait delays from a single cooperative loop, see
//! [`bridge::Bridge::run`].
//!
//! GPIO, delays, the clock and the serial channel are provided by the caller
//! through [`bus::io::PinIO`], [`embedded_hal::delay::DelayNs`],
//! [`timing::Monotonic`] and [`usb::SerialIO`].
//!
//! # Reference material
//! * <https://www.burtonsys.com/ps2_chapweske.htm>
//! * <http://classiccomputers.info/down/IBM_PS2/documents/PS2_Hardware_Interface_Technical_Reference_May88.pdf>

#![cfg_attr(not(test), no_std)]
#![forbid(missing_debug_implementations)]

pub mod bridge;
pub mod bus;
pub mod config;
pub mod device;
pub mod timing;
pub mod transceiver;
pub mod usb;

pub use embedded_hal;

pub use crate::bridge::{Bridge, BridgeContext};
pub use crate::config::Config;
