use bitflags::bitflags;

/// Logical state of an open-collector bus line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    Released,
    Pulled,
}

/// Raw input value of a released line. Inputs are not inverted.
pub const IN_RELEASED: bool = true;

/// Raw output values. Outputs drive the open-collector transistor, so
/// writing 1 pulls the line low.
pub const OUT_RELEASED: bool = false;
pub const OUT_PULLED: bool = true;

/// Convert a raw input pin value to a line level.
pub fn input_level(raw: bool) -> Level {
    if raw == IN_RELEASED {
        Level::Released
    } else {
        Level::Pulled
    }
}

/// Convert a line level to the raw value written to the output pin.
pub fn output_bit(level: Level) -> bool {
    match level {
        Level::Released => OUT_RELEASED,
        Level::Pulled => OUT_PULLED,
    }
}

bitflags! {
    /// Snapshot of both bus lines. A set bit means the line is released.
    pub struct LineState: u8 {
        const CLOCK = 0b0000_0001;
        const DATA = 0b0000_0010;
    }
}

impl LineState {
    pub fn from_levels(clock: Level, data: Level) -> Self {
        let mut state = LineState::empty();
        state.set(LineState::CLOCK, clock == Level::Released);
        state.set(LineState::DATA, data == Level::Released);
        state
    }

    pub fn clock(&self) -> Level {
        if self.contains(LineState::CLOCK) { Level::Released } else { Level::Pulled }
    }

    pub fn data(&self) -> Level {
        if self.contains(LineState::DATA) { Level::Released } else { Level::Pulled }
    }

    /// Both lines released.
    pub fn bus_free(&self) -> bool {
        self.contains(LineState::CLOCK | LineState::DATA)
    }
}

/// DATA setup time before the clock edge when sending.
pub const DATA_SETUP_US: u32 = 5;
pub const CLOCK_LOW_US: u32 = 35;
pub const CLOCK_HIGH_US: u32 = 35;
/// Half period of the acknowledgment clock pulse.
pub const ACK_PULSE_US: u32 = 20;
