#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use ps2_usb_bridge::bus::frame::odd_parity;
use ps2_usb_bridge::bus::io::{Pin, PinIO};
use ps2_usb_bridge::bus::raw::OUT_PULLED;
use ps2_usb_bridge::embedded_hal::delay::DelayNs;
use ps2_usb_bridge::timing::Monotonic;
use ps2_usb_bridge::usb::SerialIO;
use ps2_usb_bridge::{Bridge, Config};

/// Virtual time shared by the codec delays and the monotonic clock.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock(Rc<Cell<u64>>);

impl VirtualClock {
    pub fn advance_us(&self, us: u64) {
        self.0.set(self.0.get() + us * 1000);
    }

    pub fn elapsed_us(&self) -> u64 {
        self.0.get() / 1000
    }
}

impl DelayNs for VirtualClock {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + ns as u64);
    }
}

impl Monotonic for VirtualClock {
    fn now_us(&mut self) -> u64 {
        self.elapsed_us()
    }
}

pub fn frame_bits(data: u8, parity: bool) -> Vec<bool> {
    let mut bits = vec![false];
    bits.extend((0..8).map(|i| (data >> i) & 1 == 1));
    bits.push(parity);
    bits.push(true);
    bits
}

const FRAME_LEN: usize = 11;

#[derive(Debug, Default)]
pub struct PeerState {
    pub powered: bool,
    device_clock_pulled: bool,
    device_data_pulled: bool,
    peer_clock_pulled: bool,
    peer_data_pulled: bool,
    /// Frame being sent to the bridge and the index of the presented bit.
    frame: Option<(Vec<bool>, usize)>,
    /// Acknowledged frames sent to the bridge.
    pub acked: usize,
    /// Frames abandoned because the bridge started sending.
    pub aborted: usize,
    rx_bits: Vec<bool>,
    /// Bytes received from the bridge.
    pub received: Vec<u8>,
    pub bad_frames: usize,
}

impl PeerState {
    fn clock(&self) -> bool {
        !(self.device_clock_pulled || self.peer_clock_pulled)
    }

    fn data(&self) -> bool {
        let peer = match &self.frame {
            Some((bits, index)) => bits.get(*index).copied().unwrap_or(true),
            None => !self.peer_data_pulled,
        };
        peer && !self.device_data_pulled
    }

    fn clock_falling(&mut self) {
        match self.frame.take() {
            Some((_, index)) if index >= FRAME_LEN => {
                if self.device_data_pulled {
                    self.acked += 1;
                }
            }
            Some(frame) => self.frame = Some(frame),
            None => {
                let bit = self.data();
                self.rx_bits.push(bit);
                if self.rx_bits.len() == FRAME_LEN {
                    self.decode_rx();
                }
            }
        }
    }

    fn clock_rising(&mut self) {
        if let Some((_, index)) = &mut self.frame {
            *index += 1;
        }
    }

    fn decode_rx(&mut self) {
        let bits: Vec<bool> = self.rx_bits.drain(..).collect();
        let data = (0..8).fold(0u8, |acc, i| acc | ((bits[1 + i] as u8) << i));
        let ones = bits[1..10].iter().filter(|&&b| b).count();
        if !bits[0] && bits[10] && ones % 2 == 1 {
            self.received.push(data);
        } else {
            self.bad_frames += 1;
        }
    }
}

/// Host side of the PS/2 link, wired to the bridge pins.
#[derive(Debug, Clone, Default)]
pub struct SimPeer(Rc<RefCell<PeerState>>);

impl SimPeer {
    pub fn state(&self) -> std::cell::Ref<'_, PeerState> {
        self.0.borrow()
    }

    pub fn set_power(&self, powered: bool) {
        self.0.borrow_mut().powered = powered;
    }

    /// Start sending a byte to the bridge with correct parity.
    pub fn send(&self, data: u8) {
        self.send_bits(frame_bits(data, odd_parity(data)));
    }

    pub fn send_bits(&self, bits: Vec<bool>) {
        let mut state = self.0.borrow_mut();
        state.peer_clock_pulled = false;
        state.peer_data_pulled = false;
        state.frame = Some((bits, 0));
    }

    pub fn sending(&self) -> bool {
        self.0.borrow().frame.is_some()
    }

    /// Inhibit the bus and hold the request to send condition.
    pub fn hold_request_to_send(&self) {
        let mut state = self.0.borrow_mut();
        state.peer_clock_pulled = true;
        state.peer_data_pulled = true;
    }

    pub fn inhibit(&self) {
        self.0.borrow_mut().peer_clock_pulled = true;
    }

    pub fn release(&self) {
        let mut state = self.0.borrow_mut();
        state.peer_clock_pulled = false;
        state.peer_data_pulled = false;
    }

    pub fn received(&self) -> Vec<u8> {
        self.0.borrow().received.clone()
    }
}

impl PinIO for SimPeer {
    fn read(&mut self, pin: Pin) -> bool {
        let state = self.0.borrow();
        match pin {
            Pin::Clock => state.clock(),
            Pin::Data => state.data(),
            Pin::Power => state.powered,
        }
    }

    fn write(&mut self, pin: Pin, value: bool) {
        let mut state = self.0.borrow_mut();
        let pulled = value == OUT_PULLED;

        match pin {
            Pin::Clock => {
                let was_pulled = state.device_clock_pulled;
                state.device_clock_pulled = pulled;
                if pulled && !was_pulled {
                    state.clock_falling();
                } else if !pulled && was_pulled {
                    state.clock_rising();
                }
            }
            Pin::Data => {
                state.device_data_pulled = pulled;
                let collision = match &state.frame {
                    Some((_, index)) => pulled && *index < FRAME_LEN,
                    None => false,
                };
                if collision {
                    state.frame = None;
                    state.aborted += 1;
                }
            }
            Pin::Power => (),
        }
    }
}

#[derive(Debug)]
pub struct HostState {
    pub ready: bool,
    pub inbound: VecDeque<Vec<u8>>,
    pub reports: Vec<Vec<u8>>,
}

/// USB host end of the serial channel.
#[derive(Debug, Clone)]
pub struct SimHost(Rc<RefCell<HostState>>);

impl SimHost {
    pub fn new() -> Self {
        SimHost(Rc::new(RefCell::new(HostState {
            ready: true,
            inbound: VecDeque::new(),
            reports: Vec::new(),
        })))
    }

    pub fn write(&self, message: &[u8]) {
        self.0.borrow_mut().inbound.push_back(message.to_vec());
    }

    pub fn set_ready(&self, ready: bool) {
        self.0.borrow_mut().ready = ready;
    }

    pub fn pending_messages(&self) -> usize {
        self.0.borrow().inbound.len()
    }

    pub fn take_reports(&self) -> Vec<Vec<u8>> {
        std::mem::replace(&mut self.0.borrow_mut().reports, Vec::new())
    }
}

impl SerialIO for SimHost {
    fn receive_available(&mut self, buffer: &mut [u8]) -> usize {
        match self.0.borrow_mut().inbound.pop_front() {
            Some(message) => {
                let len = message.len().min(buffer.len());
                buffer[..len].copy_from_slice(&message[..len]);
                len
            }
            None => 0,
        }
    }

    fn send(&mut self, bytes: &[u8]) {
        self.0.borrow_mut().reports.push(bytes.to_vec());
    }

    fn ready(&mut self) -> bool {
        self.0.borrow().ready
    }
}

pub type TestBridge = Bridge<SimPeer, VirtualClock, SimHost, VirtualClock>;

/// Bridge wired to a simulated peer and host. Every poll advances virtual
/// time by one default tick before running the loop body.
#[derive(Debug)]
pub struct Rig {
    pub bridge: TestBridge,
    pub peer: SimPeer,
    pub host: SimHost,
    pub clock: VirtualClock,
}

impl Rig {
    pub fn new(config: Config) -> Self {
        Self::with_power(config, false)
    }

    pub fn with_power(config: Config, powered: bool) -> Self {
        let peer = SimPeer::default();
        peer.set_power(powered);
        let host = SimHost::new();
        let clock = VirtualClock::default();

        let bridge = Bridge::new(peer.clone(), clock.clone(), host.clone(), clock.clone(), config);

        Self { bridge, peer, host, clock }
    }

    pub fn poll(&mut self) {
        self.clock.advance_us(100);
        self.bridge.poll();
    }

    pub fn poll_n(&mut self, count: usize) {
        for _ in 0..count {
            self.poll();
        }
    }

    /// Poll until `done` returns true. Returns the number of polls used.
    pub fn poll_until<F: FnMut(&Rig) -> bool>(&mut self, max_polls: usize, mut done: F) -> Option<usize> {
        for i in 0..max_polls {
            if done(self) {
                return Some(i);
            }
            self.poll();
        }
        if done(self) { Some(max_polls) } else { None }
    }

    /// Let the peer send a byte and poll until it was clocked in.
    pub fn peer_sends(&mut self, data: u8) {
        self.peer.send(data);
        let done = self.poll_until(10, |rig| !rig.peer.sending());
        assert!(done.is_some(), "bridge did not receive {:#04x}", data);
    }

    /// Poll until the peer has received `count` bytes in total.
    pub fn wait_received(&mut self, count: usize) -> Vec<u8> {
        let done = self.poll_until(200, |rig| rig.peer.state().received.len() >= count);
        assert!(done.is_some(), "peer received only {:?}", self.peer.received());
        self.peer.received()
    }
}
