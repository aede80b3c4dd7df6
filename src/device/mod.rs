//! Device abstraction layer for the Kraken V3 family.
//!
//! Provides the model table, transports, control channels and the poll cycle.

pub mod control;
pub mod kraken;
pub mod models;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use control::ControlChannel;
pub use kraken::{KrakenDevice, POLL_ATTEMPTS, Readings};
pub use models::{ModelSpec, find_model, is_supported};
pub use transport::{
    DeviceEntry, HidStream, HidTransport, UsbTransport, select_device, supported_devices,
};
