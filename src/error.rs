//! Custom error types for NZXT Kraken V3 devices.
//!
//! This module provides fine-grained error handling for device communication,
//! packet validation, and configuration loading.

use thiserror::Error;

/// Main error type for Kraken device operations.
#[derive(Error, Debug)]
pub enum KrakenError {
    /// Device not found during enumeration.
    #[error("No supported Kraken device found. Check USB connection and permissions.")]
    DeviceNotFound,

    /// Product id does not belong to any known model.
    #[error("Unsupported product id {product_id:#06x}")]
    UnsupportedDevice { product_id: u16 },

    /// The transport refused to open (device busy or unplugged).
    #[error("Failed to open device")]
    OpenFailed,

    /// HID communication error.
    #[error("HID communication error: {0}")]
    HidError(#[from] hidapi::HidError),

    /// The device answered with zero bytes.
    #[error("Empty response from device")]
    EmptyResponse,

    /// Telemetry packet shorter than the active layout requires.
    #[error("Packet too short: {len} bytes, expected at least {min}")]
    PacketTooShort { len: usize, min: usize },

    /// Generic invalid input error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be read or written.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KrakenError {
    /// Whether this error describes a missing or undersized response.
    pub fn is_invalid_packet(&self) -> bool {
        matches!(
            self,
            KrakenError::EmptyResponse | KrakenError::PacketTooShort { .. }
        )
    }
}

/// Result type alias for Kraken operations.
pub type Result<T> = std::result::Result<T, KrakenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_packet_classification() {
        assert!(KrakenError::EmptyResponse.is_invalid_packet());
        assert!(KrakenError::PacketTooShort { len: 3, min: 20 }.is_invalid_packet());
        assert!(!KrakenError::OpenFailed.is_invalid_packet());
    }

    #[test]
    fn test_messages() {
        let err = KrakenError::UnsupportedDevice { product_id: 0x3008 };
        assert_eq!(err.to_string(), "Unsupported product id 0x3008");

        let err = KrakenError::PacketTooShort { len: 12, min: 26 };
        assert_eq!(
            err.to_string(),
            "Packet too short: 12 bytes, expected at least 26"
        );
    }
}
