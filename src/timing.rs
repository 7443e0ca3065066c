//! Software time base.
//!
//! All protocol timeouts and send guards are counted in ticks (100 µs by
//! default). Ticks are derived from a monotonic clock, so the loop body
//! duration does not change the tick length.

/// Monotonic microsecond clock.
pub trait Monotonic {
    fn now_us(&mut self) -> u64;
}

/// Minimum time the peer needs after a response before the next send.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Guard {
    /// After acknowledging set status indicators or read ID.
    Short,
    /// After reset and after bytes forwarded from the USB host.
    Generic,
}

/// Saturating tick counters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct TimingCounters {
    since_last_send: u32,
    since_state_entry: u32,
    send_guard_target: u32,
}

impl TimingCounters {
    pub fn new(send_guard_target: u32) -> Self {
        Self {
            since_last_send: 0,
            since_state_entry: 0,
            send_guard_target,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_elapsed(since_last_send: u32, since_state_entry: u32, send_guard_target: u32) -> Self {
        Self { since_last_send, since_state_entry, send_guard_target }
    }

    pub fn advance(&mut self, ticks: u32) {
        self.since_last_send = self.since_last_send.saturating_add(ticks);
        self.since_state_entry = self.since_state_entry.saturating_add(ticks);
    }

    pub fn since_last_send(&self) -> u32 {
        self.since_last_send
    }

    pub fn since_state_entry(&self) -> u32 {
        self.since_state_entry
    }

    pub fn send_guard_target(&self) -> u32 {
        self.send_guard_target
    }

    pub fn set_send_guard_target(&mut self, ticks: u32) {
        self.send_guard_target = ticks;
    }

    pub fn guard_elapsed(&self) -> bool {
        self.since_last_send >= self.send_guard_target
    }

    pub fn reset_last_send(&mut self) {
        self.since_last_send = 0;
    }

    pub fn reset_state_entry(&mut self) {
        self.since_state_entry = 0;
    }
}

/// Converts monotonic clock readings to whole ticks.
#[derive(Debug)]
pub struct TimeBase {
    tick_us: u32,
    last_tick_us: u64,
}

impl TimeBase {
    pub fn new(tick_us: u32, now_us: u64) -> Self {
        Self {
            tick_us: tick_us.max(1),
            last_tick_us: now_us,
        }
    }

    /// Number of whole ticks since the previous call. The remainder is
    /// carried over to the next call.
    pub fn tick(&mut self, now_us: u64) -> u32 {
        let ticks = now_us.saturating_sub(self.last_tick_us) / self.tick_us as u64;
        self.last_tick_us += ticks * self.tick_us as u64;

        if ticks > u32::MAX as u64 {
            u32::MAX
        } else {
            ticks as u32
        }
    }

    /// Restart tick counting at `now_us`, dropping the partial tick.
    pub fn resync(&mut self, now_us: u64) {
        self.last_tick_us = now_us;
    }
}
