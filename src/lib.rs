//! NZXT Kraken V3 Driver Library
//!
//! A Rust driver for the NZXT Kraken X3, Z3, Elite, 2023, Elite V2 and
//! Plus V2 liquid coolers.
//!
//! # Features
//!
//! - Read device status (liquid temperature, pump/fan RPM, duty)
//! - Set fixed pump and fan speeds
//! - One table-driven decoder for every model
//! - Bounded retry around a flaky HID transport
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//! use hidapi::HidApi;
//! use nzxt_kraken3_driver::device::{KrakenDevice, UsbTransport, select_device, supported_devices};
//! use nzxt_kraken3_driver::host::{SensorList, TracingLogger};
//! use nzxt_kraken3_driver::protocol::Channel;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Rc::new(HidApi::new()?);
//!     let entry = select_device(supported_devices(&api), None)?;
//!     let transport = UsbTransport::new(Rc::clone(&api), &entry.path);
//!
//!     let mut sensors = SensorList::new();
//!     let mut kraken = KrakenDevice::attach(
//!         entry.product_id,
//!         entry.serial_or_path(),
//!         transport,
//!         Rc::new(TracingLogger),
//!         &mut sensors,
//!     )?;
//!
//!     // Read current status
//!     kraken.update();
//!     println!("{}", kraken.readings());
//!
//!     // Set fixed speeds
//!     kraken.set_control(Channel::Pump, 80.0);
//!     kraken.set_control(Channel::Fan, 50.0);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod host;
pub mod protocol;
pub mod utils;

// Re-exports for convenience
pub use device::{KrakenDevice, ModelSpec};
pub use error::{KrakenError, Result};
pub use protocol::Channel;
