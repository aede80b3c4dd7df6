//! HID command definitions and builders for the Kraken V3 family.
//!
//! Covers the poll request, the fixed-duty speed command and the per-channel
//! header bytes that select pump or fan on a given firmware revision.

// =============================================================================
// Constants
// =============================================================================

/// HID report length for reads and writes.
pub const HID_REPORT_LENGTH: usize = 64;

/// NZXT Vendor ID.
pub const NZXT_VID: u16 = 0x1E71;

/// Number of duty bytes in a speed command.
pub const DUTY_POINTS: usize = 40;

/// Total length of a speed command: opcode + header + duty bytes.
pub const COMMAND_PACKET_LENGTH: usize = 1 + CHANNEL_HEADER_LENGTH + DUTY_POINTS;

/// Length of a channel header.
pub const CHANNEL_HEADER_LENGTH: usize = 3;

/// Highest duty accepted by any channel.
pub const MAX_DUTY: u8 = 100;

// =============================================================================
// HID Commands
// =============================================================================

/// Request device status (temperature, RPM, duty).
/// Sent before every telemetry read.
pub const CMD_REQUEST_STATUS: [u8; 2] = [0x74, 0x01];

/// Set speed opcode: [0x72, header[0..3], duty x 40]
pub const CMD_SET_SPEED: u8 = 0x72;

/// Offset of the first duty byte in a speed command.
const OFFSET_DUTY: usize = 1 + CHANNEL_HEADER_LENGTH;

// =============================================================================
// Speed Channels
// =============================================================================

/// Three header bytes identifying the actuator a speed command targets.
pub type ChannelHeader = [u8; CHANNEL_HEADER_LENGTH];

/// Speed control channel identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Pump channel - minimum 20%, maximum 100%.
    Pump,
    /// Fan channel - minimum 0%, maximum 100%.
    Fan,
}

impl Channel {
    /// Get the minimum duty cycle for this channel.
    pub const fn min_duty(&self) -> u8 {
        match self {
            Channel::Pump => 20,
            Channel::Fan => 0,
        }
    }

    /// Duty the host falls back to when control is released.
    pub const fn reset_duty(&self) -> u8 {
        match self {
            Channel::Pump => 60,
            Channel::Fan => 30,
        }
    }

    /// Get the maximum duty cycle for this channel.
    pub const fn max_duty(&self) -> u8 {
        MAX_DUTY
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Pump => write!(f, "Pump"),
            Channel::Fan => write!(f, "Fan"),
        }
    }
}

/// Clamp a requested percentage into `[min, 100]`.
///
/// The value is truncated toward zero first, so `45.9` becomes `45`.
/// `NaN` truncates to zero.
pub fn clamp_duty(value: f32, min: u8) -> u8 {
    let truncated = value as i32;
    let duty = truncated.max(i32::from(min)).min(i32::from(MAX_DUTY));
    // Always within 0..=100 here
    duty as u8
}

// =============================================================================
// Command Packet
// =============================================================================

/// A 44-byte fixed-duty speed command.
///
/// The header is written once at construction; [`CommandPacket::set_duty`]
/// only ever touches the 40 duty bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPacket {
    buf: [u8; COMMAND_PACKET_LENGTH],
}

impl CommandPacket {
    /// Build a command for the channel identified by `header`, duty zeroed.
    pub fn new(header: ChannelHeader) -> Self {
        let mut buf = [0u8; COMMAND_PACKET_LENGTH];
        buf[0] = CMD_SET_SPEED;
        buf[1..OFFSET_DUTY].copy_from_slice(&header);
        Self { buf }
    }

    /// Overwrite every duty byte with `duty`.
    pub fn set_duty(&mut self, duty: u8) {
        self.buf[OFFSET_DUTY..].fill(duty);
    }

    /// The channel header given at construction.
    pub fn header(&self) -> ChannelHeader {
        let mut header = [0u8; CHANNEL_HEADER_LENGTH];
        header.copy_from_slice(&self.buf[1..OFFSET_DUTY]);
        header
    }

    /// The 40 duty bytes.
    pub fn duties(&self) -> &[u8] {
        &self.buf[OFFSET_DUTY..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}
