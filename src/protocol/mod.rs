//! HID protocol implementation for the NZXT Kraken V3 family.
//!
//! This module contains the wire constants, the speed command builder and the
//! table-driven telemetry decoder shared by every model.

pub mod commands;
pub mod telemetry;

pub use commands::*;
pub use telemetry::*;
