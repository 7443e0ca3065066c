
use core::convert::Infallible;

use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// Physical pins used by the bridge.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pin {
    Clock,
    Data,
    /// Peripheral power rail sense. Input only.
    Power,
}

pub trait PinIO {
    // Reading is `&mut self`, because some GPIO drivers need it.
    fn read(&mut self, pin: Pin) -> bool;
    /// Writes to `Pin::Power` are ignored.
    fn write(&mut self, pin: Pin, value: bool);
}

/// `PinIO` over `embedded-hal` pins. Each bus line uses a separate input and
/// output pin, the output driving an open-collector transistor.
#[derive(Debug)]
pub struct HalPins<CI, DI, CO, DO, PI> {
    pub clock_in: CI,
    pub data_in: DI,
    pub clock_out: CO,
    pub data_out: DO,
    pub power_in: PI,
}

impl <CI, DI, CO, DO, PI> PinIO for HalPins<CI, DI, CO, DO, PI>
    where CI: InputPin<Error = Infallible>,
          DI: InputPin<Error = Infallible>,
          CO: OutputPin<Error = Infallible>,
          DO: OutputPin<Error = Infallible>,
          PI: InputPin<Error = Infallible>,
{
    fn read(&mut self, pin: Pin) -> bool {
        let result = match pin {
            Pin::Clock => self.clock_in.is_high(),
            Pin::Data => self.data_in.is_high(),
            Pin::Power => self.power_in.is_high(),
        };

        match result {
            Ok(value) => value,
            Err(e) => match e {},
        }
    }

    fn write(&mut self, pin: Pin, value: bool) {
        let state = PinState::from(value);

        let result = match pin {
            Pin::Clock => self.clock_out.set_state(state),
            Pin::Data => self.data_out.set_state(state),
            Pin::Power => return,
        };

        if let Err(e) = result {
            match e {}
        }
    }
}
