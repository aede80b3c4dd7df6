//! Capability table for every supported Kraken model.
//!
//! A model is pure data: product ids, channel headers and a telemetry layout.
//! Adding a model means adding a `ModelSpec` and a registry entry.

use crate::protocol::{
    BASE_LAYOUT, CMD_REQUEST_STATUS, ChannelHeader, FAN_LAYOUT, NZXT_VID, TelemetryLayout,
};

/// Static description of one Kraken SKU.
#[derive(Debug, PartialEq, Eq)]
pub struct ModelSpec {
    /// Display name used in sensor names and log lines.
    pub name: &'static str,
    /// USB product ids this model answers to.
    pub product_ids: &'static [u16],
    /// Header selecting the pump in a speed command.
    pub pump_header: ChannelHeader,
    /// Header selecting the fan; `None` for pump-only models.
    pub fan_header: Option<ChannelHeader>,
    /// Telemetry packet shape.
    pub layout: &'static TelemetryLayout,
}

impl ModelSpec {
    /// Whether `product_id` belongs to this model.
    pub fn supports(&self, product_id: u16) -> bool {
        self.product_ids.contains(&product_id)
    }

    /// Request sent before every telemetry read.
    pub const fn poll_request(&self) -> [u8; 2] {
        CMD_REQUEST_STATUS
    }

    pub fn has_fan(&self) -> bool {
        self.fan_header.is_some()
    }

    /// Shortest packet that decodes every field of this model.
    ///
    /// The poll cycle accepts anything from [`BASE_PACKET_LENGTH`] up; a
    /// reply between the two is taken as a success that updates nothing.
    ///
    /// [`BASE_PACKET_LENGTH`]: crate::protocol::BASE_PACKET_LENGTH
    pub fn min_packet_len(&self) -> usize {
        self.layout.min_len
    }
}

// =============================================================================
// Models
// =============================================================================

/// Kraken X53/X63/X73: pump only.
pub static KRAKEN_X3: ModelSpec = ModelSpec {
    name: "Kraken X3",
    product_ids: &[0x2007, 0x2014],
    pump_header: [0x01, 0x00, 0x00],
    fan_header: None,
    layout: &BASE_LAYOUT,
};

/// Kraken Z53/Z63/Z73.
pub static KRAKEN_Z3: ModelSpec = ModelSpec {
    name: "Kraken Z3",
    product_ids: &[0x3008],
    pump_header: [0x01, 0x00, 0x00],
    fan_header: Some([0x02, 0x00, 0x00]),
    layout: &FAN_LAYOUT,
};

pub static KRAKEN_ELITE: ModelSpec = ModelSpec {
    name: "Kraken Elite",
    product_ids: &[0x300C],
    pump_header: [0x01, 0x01, 0x00],
    fan_header: Some([0x02, 0x01, 0x01]),
    layout: &FAN_LAYOUT,
};

/// Kraken 2023 (non-Elite).
pub static KRAKEN_2023: ModelSpec = ModelSpec {
    name: "Kraken",
    product_ids: &[0x300E],
    pump_header: [0x01, 0x01, 0x00],
    fan_header: Some([0x02, 0x01, 0x01]),
    layout: &FAN_LAYOUT,
};

pub static KRAKEN_ELITE_V2: ModelSpec = ModelSpec {
    name: "Kraken Elite V2",
    product_ids: &[0x3012],
    pump_header: [0x01, 0x01, 0x00],
    fan_header: Some([0x02, 0x01, 0x01]),
    layout: &FAN_LAYOUT,
};

pub static KRAKEN_PLUS_V2: ModelSpec = ModelSpec {
    name: "Kraken Plus V2",
    product_ids: &[0x3014],
    pump_header: [0x01, 0x01, 0x00],
    fan_header: Some([0x02, 0x01, 0x01]),
    layout: &FAN_LAYOUT,
};

// =============================================================================
// Registry
// =============================================================================

/// Product-id predicate of a registry entry.
pub type Predicate = fn(u16) -> bool;

/// Registered models, most specific first. Evaluated once at attach time.
pub static REGISTRY: [(Predicate, &ModelSpec); 6] = [
    (|pid| KRAKEN_PLUS_V2.supports(pid), &KRAKEN_PLUS_V2),
    (|pid| KRAKEN_ELITE_V2.supports(pid), &KRAKEN_ELITE_V2),
    (|pid| KRAKEN_2023.supports(pid), &KRAKEN_2023),
    (|pid| KRAKEN_ELITE.supports(pid), &KRAKEN_ELITE),
    (|pid| KRAKEN_Z3.supports(pid), &KRAKEN_Z3),
    (|pid| KRAKEN_X3.supports(pid), &KRAKEN_X3),
];

/// Every registered model, in registry order.
pub fn models() -> impl Iterator<Item = &'static ModelSpec> {
    REGISTRY.iter().map(|(_, model)| *model)
}

/// Find the model for a product id.
pub fn find_model(product_id: u16) -> Option<&'static ModelSpec> {
    REGISTRY
        .iter()
        .find(|(supports, _)| supports(product_id))
        .map(|(_, model)| *model)
}

/// Whether a vendor/product pair is a supported Kraken.
pub fn is_supported(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == NZXT_VID && find_model(product_id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PIDS: [u16; 7] = [0x2007, 0x2014, 0x3008, 0x300C, 0x300E, 0x3012, 0x3014];

    #[test]
    fn test_find_model() {
        assert_eq!(find_model(0x2007), Some(&KRAKEN_X3));
        assert_eq!(find_model(0x2014), Some(&KRAKEN_X3));
        assert_eq!(find_model(0x3008), Some(&KRAKEN_Z3));
        assert_eq!(find_model(0x300C), Some(&KRAKEN_ELITE));
        assert_eq!(find_model(0x300E), Some(&KRAKEN_2023));
        assert_eq!(find_model(0x3012), Some(&KRAKEN_ELITE_V2));
        assert_eq!(find_model(0x3014), Some(&KRAKEN_PLUS_V2));
        assert_eq!(find_model(0x1234), None);
    }

    #[test]
    fn test_predicates_are_mutually_exclusive() {
        for pid in ALL_PIDS {
            let matches = models().filter(|m| m.supports(pid)).count();
            assert_eq!(matches, 1, "pid {pid:#06x}");
        }
    }

    #[test]
    fn test_registry_predicates_agree_with_models() {
        for (predicate, model) in &REGISTRY {
            for pid in ALL_PIDS {
                assert_eq!(predicate(pid), model.supports(pid));
            }
        }
    }

    #[test]
    fn test_is_supported_checks_vendor() {
        assert!(is_supported(NZXT_VID, 0x3008));
        assert!(!is_supported(0x1234, 0x3008));
        assert!(!is_supported(NZXT_VID, 0x170E));
    }

    #[test]
    fn test_model_shapes() {
        assert!(!KRAKEN_X3.has_fan());
        assert_eq!(KRAKEN_X3.min_packet_len(), 20);
        assert_eq!(KRAKEN_Z3.min_packet_len(), 26);
        assert_eq!(KRAKEN_Z3.fan_header, Some([0x02, 0x00, 0x00]));
        for model in [&KRAKEN_ELITE, &KRAKEN_2023, &KRAKEN_ELITE_V2, &KRAKEN_PLUS_V2] {
            assert_eq!(model.pump_header, [0x01, 0x01, 0x00]);
            assert_eq!(model.fan_header, Some([0x02, 0x01, 0x01]));
            assert_eq!(model.layout, &FAN_LAYOUT);
        }
    }

    #[test]
    fn test_poll_request() {
        for model in models() {
            assert_eq!(model.poll_request(), [0x74, 0x01]);
        }
    }
}
