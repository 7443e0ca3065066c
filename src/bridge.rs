//! Cooperative scheduling loop.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::bus::io::PinIO;
use crate::bus::Bus;
use crate::config::Config;
use crate::device::command_queue::OutboundQueue;
use crate::timing::{Monotonic, TimeBase, TimingCounters};
use crate::transceiver::state::ReceiveState;
use crate::transceiver::{TickEvent, Transceiver};
use crate::usb::{self, PowerStatus, SerialIO};

/// State shared by the transceiver and the USB side. The queue is filled by
/// the USB side and by command responses, and drained by the transceiver.
#[derive(Debug)]
pub struct BridgeContext {
    pub queue: OutboundQueue,
    pub counters: TimingCounters,
    pub power: PowerStatus,
    pub config: Config,
}

impl BridgeContext {
    pub fn new(config: Config, powered: bool) -> Self {
        Self {
            queue: OutboundQueue::new(),
            counters: TimingCounters::new(config.generic_guard),
            power: PowerStatus::new(powered),
            config,
        }
    }
}

#[derive(Debug)]
pub struct Bridge<T: PinIO, D: DelayNs, S: SerialIO, M: Monotonic> {
    bus: Bus<T, D>,
    serial: S,
    clock: M,
    time: TimeBase,
    transceiver: Transceiver,
    context: BridgeContext,
}

impl <T: PinIO, D: DelayNs, S: SerialIO, M: Monotonic> Bridge<T, D, S, M> {
    /// Releases both bus lines and samples the power line.
    pub fn new(pins: T, delay: D, serial: S, mut clock: M, config: Config) -> Self {
        let mut bus = Bus::new(pins, delay);
        let powered = bus.power();
        let time = TimeBase::new(config.tick_us, clock.now_us());

        info!("bridge started, peripheral power {}", powered);

        Self {
            bus,
            serial,
            clock,
            time,
            transceiver: Transceiver::new(),
            context: BridgeContext::new(config, powered),
        }
    }

    /// One loop iteration: transceiver, USB side, then time base.
    pub fn poll(&mut self) {
        let ready = self.serial.ready();

        match self.transceiver.tick(&mut self.context, &mut self.bus, ready) {
            // The send guard counts from the end of the frame.
            TickEvent::Sent(_) => self.time.resync(self.clock.now_us()),
            TickEvent::Report(report) if ready => {
                usb::send_report(&mut self.serial, report, self.context.config.status_framing);
            }
            TickEvent::Report(report) => warn!("USB not ready, dropped report {:?}", report),
            TickEvent::None => (),
        }

        if ready {
            let powered = self.bus.power();
            usb::tick(&mut self.context, &mut self.serial, powered);
        }

        let ticks = self.time.tick(self.clock.now_us());
        self.context.counters.advance(ticks);
    }

    pub fn run(mut self) -> ! {
        loop {
            self.poll();
        }
    }

    pub fn context(&self) -> &BridgeContext {
        &self.context
    }

    pub fn state(&self) -> ReceiveState {
        self.transceiver.state()
    }

    pub fn transceiver(&self) -> &Transceiver {
        &self.transceiver
    }

    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    pub fn exit(self) -> (T, D, S, M) {
        let (pins, delay) = self.bus.exit();
        (pins, delay, self.serial, self.clock)
    }
}
