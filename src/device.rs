//! The emulated keyboard: outbound byte queue and command handling.

pub mod command_queue;
pub mod keyboard;
