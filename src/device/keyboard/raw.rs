use bitflags::bitflags;

/// Commands the PS/2 peer sends to the keyboard.
#[derive(Debug)]
pub struct FromPeer;

impl FromPeer {
    pub const SET_STATUS_INDICATORS: u8 = 0xED;
    pub const ECHO: u8 = 0xEE;
    pub const READ_ID: u8 = 0xF2;
    pub const RESEND: u8 = 0xFE;
    pub const RESET: u8 = 0xFF;
}

/// Responses the keyboard sends to the PS/2 peer.
#[derive(Debug)]
pub struct ToPeer;

impl ToPeer {
    pub const BAT_COMPLETION_CODE: u8 = 0xAA;
    pub const ECHO: u8 = 0xEE;
    pub const ACK: u8 = 0xFA;
    pub const RESEND: u8 = 0xFE;
}

bitflags! {
    /// Argument byte of `FromPeer::SET_STATUS_INDICATORS`.
    pub struct StatusIndicators: u8 {
        const SCROLL_LOCK = 0b0000_0001;
        const NUM_LOCK = 0b0000_0010;
        const CAPS_LOCK = 0b0000_0100;
    }
}
