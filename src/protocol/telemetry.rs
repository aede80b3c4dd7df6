//! Telemetry packet layouts and decoding for the Kraken V3 family.
//!
//! Every model shares the base layout; fan-equipped models extend it with two
//! more fields. Decoding is all-or-nothing: a packet shorter than the layout's
//! minimum produces no readings at all, even if a parent layout would accept it.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{KrakenError, Result};
use crate::host::SensorKind;

// =============================================================================
// Response Parsing Offsets
// =============================================================================

/// Offset for liquid temperature integer part.
const OFFSET_TEMP_INT: usize = 15;
/// Offset for liquid temperature tenths.
const OFFSET_TEMP_DEC: usize = 16;
/// Offset for pump RPM low byte (high byte follows).
const OFFSET_PUMP_RPM: usize = 17;
/// Offset for pump duty percentage.
const OFFSET_PUMP_DUTY: usize = 19;
/// Offset for fan RPM low byte (high byte follows).
const OFFSET_FAN_RPM: usize = 23;
/// Offset for fan duty percentage.
const OFFSET_FAN_DUTY: usize = 25;

/// Minimum packet length for pump-only models.
pub const BASE_PACKET_LENGTH: usize = 20;
/// Minimum packet length for fan-equipped models.
pub const FAN_PACKET_LENGTH: usize = 26;

// =============================================================================
// Sensor Roles
// =============================================================================

/// The value a decoded field feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorRole {
    LiquidTemperature,
    PumpSpeed,
    PumpControl,
    FanSpeed,
    FanControl,
}

impl SensorRole {
    /// Prefix of the stable sensor id, completed with the device serial.
    pub const fn id_prefix(&self) -> &'static str {
        match self {
            SensorRole::LiquidTemperature => "liquidtemp",
            SensorRole::PumpSpeed => "pumprpm",
            SensorRole::PumpControl => "pumpcontrol",
            SensorRole::FanSpeed => "fanrpm",
            SensorRole::FanControl => "fancontrol",
        }
    }

    /// Leading part of the display name, completed with the model name.
    pub const fn label(&self) -> &'static str {
        match self {
            SensorRole::LiquidTemperature => "Liquid",
            SensorRole::PumpSpeed | SensorRole::PumpControl => "Pump",
            SensorRole::FanSpeed | SensorRole::FanControl => "Fan",
        }
    }

    pub const fn kind(&self) -> SensorKind {
        match self {
            SensorRole::LiquidTemperature => SensorKind::Temperature,
            SensorRole::PumpSpeed | SensorRole::FanSpeed => SensorKind::Fan,
            SensorRole::PumpControl | SensorRole::FanControl => SensorKind::Control,
        }
    }
}

// =============================================================================
// Layouts
// =============================================================================

/// How a field is assembled from packet bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `packet[whole] + packet[tenths] / 10`
    Temperature { whole: usize, tenths: usize },
    /// Little-endian u16 starting at `low`.
    Rpm { low: usize },
    /// Single percentage byte.
    Duty { offset: usize },
}

/// A single decoded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub role: SensorRole,
    pub kind: FieldKind,
}

impl Field {
    /// One past the last byte this field reads.
    pub const fn end(&self) -> usize {
        match self.kind {
            FieldKind::Temperature { whole, tenths } => {
                if whole > tenths {
                    whole + 1
                } else {
                    tenths + 1
                }
            }
            FieldKind::Rpm { low } => low + 2,
            FieldKind::Duty { offset } => offset + 1,
        }
    }

    /// Read the field. The caller guarantees `packet.len() >= self.end()`.
    fn read(&self, packet: &[u8]) -> f32 {
        match self.kind {
            FieldKind::Temperature { whole, tenths } => {
                f32::from(packet[whole]) + f32::from(packet[tenths]) / 10.0
            }
            FieldKind::Rpm { low } => f32::from(LittleEndian::read_u16(&packet[low..low + 2])),
            FieldKind::Duty { offset } => f32::from(packet[offset]),
        }
    }
}

/// Packet shape of one firmware family.
#[derive(Debug, PartialEq, Eq)]
pub struct TelemetryLayout {
    /// Shortest packet this layout will decode.
    pub min_len: usize,
    /// Layout whose fields are decoded first.
    pub parent: Option<&'static TelemetryLayout>,
    /// Fields added on top of the parent.
    pub fields: &'static [Field],
}

/// Liquid temperature, pump RPM and pump duty.
pub static BASE_LAYOUT: TelemetryLayout = TelemetryLayout {
    min_len: BASE_PACKET_LENGTH,
    parent: None,
    fields: &[
        Field {
            role: SensorRole::LiquidTemperature,
            kind: FieldKind::Temperature {
                whole: OFFSET_TEMP_INT,
                tenths: OFFSET_TEMP_DEC,
            },
        },
        Field {
            role: SensorRole::PumpSpeed,
            kind: FieldKind::Rpm {
                low: OFFSET_PUMP_RPM,
            },
        },
        Field {
            role: SensorRole::PumpControl,
            kind: FieldKind::Duty {
                offset: OFFSET_PUMP_DUTY,
            },
        },
    ],
};

/// Base layout plus fan RPM and fan duty.
pub static FAN_LAYOUT: TelemetryLayout = TelemetryLayout {
    min_len: FAN_PACKET_LENGTH,
    parent: Some(&BASE_LAYOUT),
    fields: &[
        Field {
            role: SensorRole::FanSpeed,
            kind: FieldKind::Rpm {
                low: OFFSET_FAN_RPM,
            },
        },
        Field {
            role: SensorRole::FanControl,
            kind: FieldKind::Duty {
                offset: OFFSET_FAN_DUTY,
            },
        },
    ],
};

impl TelemetryLayout {
    /// Every field of this layout, ancestors first.
    pub fn all_fields(&self) -> Vec<Field> {
        let mut fields = self.parent.map(|p| p.all_fields()).unwrap_or_default();
        fields.extend_from_slice(self.fields);
        fields
    }

    /// Roles this layout produces, ancestors first.
    pub fn roles(&self) -> Vec<SensorRole> {
        self.all_fields().iter().map(|f| f.role).collect()
    }

    pub fn has_role(&self, role: SensorRole) -> bool {
        self.all_fields().iter().any(|f| f.role == role)
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// A single decoded value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub role: SensorRole,
    pub value: f32,
}

/// Decode `packet` with `layout`.
///
/// # Errors
/// Returns `PacketTooShort` when the packet is shorter than `layout.min_len`;
/// no field is read in that case.
pub fn decode(layout: &TelemetryLayout, packet: &[u8]) -> Result<Vec<Reading>> {
    if packet.len() < layout.min_len {
        return Err(KrakenError::PacketTooShort {
            len: packet.len(),
            min: layout.min_len,
        });
    }

    Ok(layout
        .all_fields()
        .iter()
        .map(|field| Reading {
            role: field.role,
            value: field.read(packet),
        })
        .collect())
}
