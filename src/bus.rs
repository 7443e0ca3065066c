//! PS/2 bus lines and the bit level frame codec.

pub mod frame;
pub mod io;
pub mod raw;

use embedded_hal::delay::DelayNs;

use self::io::{Pin, PinIO};
use self::raw::{input_level, output_bit, Level, LineState};

/// Two wire open-collector bus (CLOCK, DATA) plus the power sense line.
///
/// All level conversions go through [`input_level`] and [`output_bit`], so
/// the rest of the crate only deals with [`Level`].
#[derive(Debug)]
pub struct Bus<T: PinIO, D: DelayNs> {
    pins: T,
    delay: D,
}

impl <T: PinIO, D: DelayNs> Bus<T, D> {
    /// Creates the bus and releases both lines.
    pub fn new(pins: T, delay: D) -> Self {
        let mut bus = Self { pins, delay };
        bus.write_clock(Level::Released);
        bus.write_data(Level::Released);
        bus
    }

    pub fn read_clock(&mut self) -> Level {
        input_level(self.pins.read(Pin::Clock))
    }

    pub fn read_data(&mut self) -> Level {
        input_level(self.pins.read(Pin::Data))
    }

    pub fn write_clock(&mut self, level: Level) {
        self.pins.write(Pin::Clock, output_bit(level))
    }

    pub fn write_data(&mut self, level: Level) {
        self.pins.write(Pin::Data, output_bit(level))
    }

    pub fn sample(&mut self) -> LineState {
        let clock = self.read_clock();
        let data = self.read_data();
        LineState::from_levels(clock, data)
    }

    /// `true` if the peripheral power rail is energized.
    pub fn power(&mut self) -> bool {
        self.pins.read(Pin::Power)
    }

    pub(crate) fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us)
    }

    pub fn exit(self) -> (T, D) {
        (self.pins, self.delay)
    }
}
