//! PS/2 frame codec.
//!
//! A frame is a start bit (pulled), 8 data bits LSB first, an odd parity bit
//! and a stop bit (released). The bridge always generates the clock, both
//! when sending and when receiving, using busy-wait delays.

use embedded_hal::delay::DelayNs;
use thiserror::Error;

use super::io::PinIO;
use super::raw::{Level, ACK_PULSE_US, CLOCK_HIGH_US, CLOCK_LOW_US, DATA_SETUP_US};
use super::Bus;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("odd parity check failed")]
    Parity,
    #[error("stop bit was not released")]
    Framing,
    #[error("peer pulled the clock line during send")]
    Inhibited,
}

/// Parity bit value which makes the number of ones in data and parity odd.
pub fn odd_parity(data: u8) -> bool {
    data.count_ones() % 2 == 0
}

fn bit_level(bit: bool) -> Level {
    if bit { Level::Released } else { Level::Pulled }
}

impl <T: PinIO, D: DelayNs> Bus<T, D> {
    /// Send one frame to the peer.
    ///
    /// With `check_bus` the clock line is checked before every bit and the
    /// send is aborted with [`FrameError::Inhibited`] if the peer holds it low.
    pub fn send_byte(&mut self, data: u8, check_bus: bool) -> Result<(), FrameError> {
        let result = self.send_frame(data, check_bus);

        if result.is_err() {
            self.write_clock(Level::Released);
            self.write_data(Level::Released);
        }

        result
    }

    fn send_frame(&mut self, data: u8, check_bus: bool) -> Result<(), FrameError> {
        self.send_bit(Level::Pulled, check_bus)?;

        for i in 0..8 {
            self.send_bit(bit_level((data >> i) & 1 == 1), check_bus)?;
        }

        self.send_bit(bit_level(odd_parity(data)), check_bus)?;
        self.send_bit(Level::Released, check_bus)
    }

    fn send_bit(&mut self, level: Level, check_bus: bool) -> Result<(), FrameError> {
        if check_bus && self.read_clock() == Level::Pulled {
            return Err(FrameError::Inhibited);
        }

        self.write_data(level);
        self.delay_us(DATA_SETUP_US);
        self.pulse_clock(CLOCK_LOW_US, CLOCK_HIGH_US);
        Ok(())
    }

    /// Receive one frame from the peer. The peer must already be holding
    /// DATA low as its start bit.
    ///
    /// The frame is acknowledged only if parity and stop bit are valid.
    pub fn recv_byte(&mut self) -> Result<u8, FrameError> {
        self.pulse_clock(CLOCK_LOW_US, CLOCK_HIGH_US);

        let mut data = 0;
        let mut ones = 0;
        for i in 0..8 {
            if self.clock_in_bit() {
                data |= 1 << i;
                ones += 1;
            }
        }

        if self.clock_in_bit() {
            ones += 1;
        }
        if ones & 1 == 0 {
            return Err(FrameError::Parity);
        }

        if !self.clock_in_bit() {
            return Err(FrameError::Framing);
        }

        self.write_data(Level::Pulled);
        self.pulse_clock(ACK_PULSE_US, ACK_PULSE_US);
        self.write_data(Level::Released);

        Ok(data)
    }

    /// Clock one bit in. DATA is sampled just before the clock is released.
    fn clock_in_bit(&mut self) -> bool {
        self.write_clock(Level::Pulled);
        self.delay_us(CLOCK_LOW_US);
        let bit = self.read_data() == Level::Released;
        self.write_clock(Level::Released);
        self.delay_us(CLOCK_HIGH_US);
        bit
    }

    fn pulse_clock(&mut self, low_us: u32, high_us: u32) {
        self.write_clock(Level::Pulled);
        self.delay_us(low_us);
        self.write_clock(Level::Released);
        self.delay_us(high_us);
    }
}
