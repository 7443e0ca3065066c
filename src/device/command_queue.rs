
use arraydeque::{Array, ArrayDeque, Saturating};

/// Capacity used by the bridge.
pub const QUEUE_CAPACITY: usize = 20;

/// Bytes waiting to be sent to the PS/2 peer, oldest first.
///
/// Pushing to a full queue drops the new byte and keeps the queued ones.
/// Bytes are removed only after they were sent, so a failed send can be
/// retried with the same byte.
#[derive(Debug)]
pub struct OutboundQueue<T: Array<Item=u8> = [u8; QUEUE_CAPACITY]> {
    bytes: ArrayDeque<T, Saturating>,
}

impl <T: Array<Item=u8>> OutboundQueue<T> {
    pub fn new() -> Self {
        Self {
            bytes: ArrayDeque::new(),
        }
    }

    /// Returns `false` if the byte was dropped.
    pub fn push(&mut self, byte: u8) -> bool {
        self.bytes.push_back(byte).is_ok()
    }

    /// Push bytes in order. Returns the number of bytes accepted.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().filter(|&&byte| self.push(byte)).count()
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes.front().copied()
    }

    pub fn pop_front(&mut self) -> Option<u8> {
        self.bytes.pop_front()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.bytes.is_full()
    }

    pub fn iter(&self) -> impl Iterator<Item=&u8> {
        self.bytes.iter()
    }
}

impl <T: Array<Item=u8>> Default for OutboundQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
