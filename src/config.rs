//! Bridge configuration.
//!
//! The standby and receive timeouts were measured on one board only and
//! need recalibration against the target hardware.

use crate::timing::Guard;

/// Default tick length.
pub const TICK_US: u32 = 100;
/// Ticks to wait in standby receive for the peer to release CLOCK.
pub const STANDBY_TIMEOUT_TICKS: u32 = 150;
/// Ticks to wait for the start bit after the handshake.
pub const RECEIVE_TIMEOUT_TICKS: u32 = 2000;
pub const SHORT_GUARD_TICKS: u32 = 4;
pub const GENERIC_GUARD_TICKS: u32 = 10;

/// Framing of the power status report.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatusFraming {
    /// `PS2USB:0` followed by the status digit.
    Bare,
    /// Same as `Bare` but prefixed with the report length (9).
    LengthPrefixed,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    pub tick_us: u32,
    pub standby_timeout: u32,
    pub receive_timeout: u32,
    pub short_guard: u32,
    pub generic_guard: u32,
    /// Check CLOCK before every sent bit and abort if the peer holds it low.
    pub check_bus_per_bit: bool,
    pub status_framing: StatusFraming,
}

impl Config {
    pub fn with_tick_us(mut self, tick_us: u32) -> Self {
        self.tick_us = tick_us;
        self
    }

    pub fn with_standby_timeout(mut self, ticks: u32) -> Self {
        self.standby_timeout = ticks;
        self
    }

    pub fn with_receive_timeout(mut self, ticks: u32) -> Self {
        self.receive_timeout = ticks;
        self
    }

    pub fn with_guards(mut self, short: u32, generic: u32) -> Self {
        self.short_guard = short;
        self.generic_guard = generic;
        self
    }

    pub fn with_check_bus_per_bit(mut self, enabled: bool) -> Self {
        self.check_bus_per_bit = enabled;
        self
    }

    pub fn with_status_framing(mut self, framing: StatusFraming) -> Self {
        self.status_framing = framing;
        self
    }

    pub fn guard_ticks(&self, guard: Guard) -> u32 {
        match guard {
            Guard::Short => self.short_guard,
            Guard::Generic => self.generic_guard,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_us: TICK_US,
            standby_timeout: STANDBY_TIMEOUT_TICKS,
            receive_timeout: RECEIVE_TIMEOUT_TICKS,
            short_guard: SHORT_GUARD_TICKS,
            generic_guard: GENERIC_GUARD_TICKS,
            check_bus_per_bit: false,
            status_framing: StatusFraming::Bare,
        }
    }
}
