//! Parsing utilities for CLI arguments and configuration values.

use crate::error::{KrakenError, Result};
use crate::protocol::Channel;

// =============================================================================
// Channel Parsing
// =============================================================================

/// Parse a channel name string into a Channel enum.
///
/// # Arguments
/// * `name` - Channel name: "fan" or "pump"
///
/// # Example
/// ```
/// use nzxt_kraken3_driver::utils::parsing::parse_channel;
/// use nzxt_kraken3_driver::protocol::Channel;
///
/// assert_eq!(parse_channel("Pump").unwrap(), Channel::Pump);
/// ```
pub fn parse_channel(name: &str) -> Result<Channel> {
    match name.to_lowercase().as_str() {
        "fan" => Ok(Channel::Fan),
        "pump" => Ok(Channel::Pump),
        _ => Err(KrakenError::InvalidInput(format!(
            "Unknown channel '{}'. Use: fan or pump",
            name
        ))),
    }
}

// =============================================================================
// Identifier Parsing
// =============================================================================

/// Parse a USB product id, either hex (`0x3008`) or decimal (`12296`).
pub fn parse_product_id(value: &str) -> Result<u16> {
    let value = value.trim();
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse(),
    };

    parsed.map_err(|_| KrakenError::InvalidInput(format!("Invalid product id '{}'", value)))
}

// =============================================================================
// Duty Parsing
// =============================================================================

/// Parse a duty percentage. Any finite number is accepted; clamping happens
/// in the control channel.
pub fn parse_duty(value: &str) -> Result<f32> {
    let duty: f32 = value
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| KrakenError::InvalidInput(format!("Invalid duty '{}'", value)))?;

    if !duty.is_finite() {
        return Err(KrakenError::InvalidInput(format!(
            "Duty must be a finite number, got '{}'",
            value
        )));
    }
    Ok(duty)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel() {
        assert!(matches!(parse_channel("fan").unwrap(), Channel::Fan));
        assert!(matches!(parse_channel("PUMP").unwrap(), Channel::Pump));
        assert!(parse_channel("invalid").is_err());
    }

    #[test]
    fn test_parse_product_id() {
        assert_eq!(parse_product_id("0x3008").unwrap(), 0x3008);
        assert_eq!(parse_product_id("0X300c").unwrap(), 0x300C);
        assert_eq!(parse_product_id("8199").unwrap(), 0x2007);
        assert!(parse_product_id("0xZZ").is_err());
        assert!(parse_product_id("70000").is_err());
    }

    #[test]
    fn test_parse_duty() {
        assert_eq!(parse_duty("55").unwrap(), 55.0);
        assert_eq!(parse_duty("42.5%").unwrap(), 42.5);
        assert_eq!(parse_duty("-10").unwrap(), -10.0);
        assert!(parse_duty("fast").is_err());
        assert!(parse_duty("inf").is_err());
    }
}
