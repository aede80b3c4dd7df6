//! Host-facing surface: sensor registration and the logger sink.
//!
//! The fan-control host owns both; a device only writes into them.

pub mod logger;
pub mod sensor;

pub use logger::{DeviceLogger, NullLogger, TracingLogger};
pub use sensor::{SensorContainer, SensorDescriptor, SensorKind, SensorList, SensorSlot};
