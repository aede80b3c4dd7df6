//! HID transport abstraction.
//!
//! A transport is a cheap, cloneable handle to one physical device. Each
//! operation opens a fresh stream, uses it and closes it again; nothing is
//! held open between calls.

use std::ffi::{CStr, CString};
use std::rc::Rc;

use hidapi::{HidApi, HidDevice};

use crate::device::models::{ModelSpec, find_model};
use crate::error::{KrakenError, Result};
use crate::protocol::{HID_REPORT_LENGTH, NZXT_VID};

/// Default HID read timeout in milliseconds.
pub const READ_TIMEOUT_MS: i32 = 2000;

/// An openable device handle.
pub trait HidTransport {
    type Stream: HidStream;

    /// Open a stream to the device.
    ///
    /// # Errors
    /// Returns `OpenFailed` when the device is busy or gone.
    fn open(&self) -> Result<Self::Stream>;
}

/// An open connection to the device.
pub trait HidStream {
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Read one input report. An empty vector means nothing arrived in time.
    fn read(&mut self) -> Result<Vec<u8>>;

    fn close(self) -> Result<()>
    where
        Self: Sized;
}

// =============================================================================
// hidapi backend
// =============================================================================

/// Transport backed by `hidapi`, addressed by device path.
#[derive(Clone)]
pub struct UsbTransport {
    api: Rc<HidApi>,
    path: CString,
    read_timeout_ms: i32,
}

impl UsbTransport {
    pub fn new(api: Rc<HidApi>, path: &CStr) -> Self {
        Self {
            api,
            path: path.to_owned(),
            read_timeout_ms: READ_TIMEOUT_MS,
        }
    }

    pub fn with_read_timeout(mut self, timeout_ms: i32) -> Self {
        self.read_timeout_ms = timeout_ms;
        self
    }

    pub fn path(&self) -> &CStr {
        &self.path
    }
}

impl std::fmt::Debug for UsbTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsbTransport")
            .field("path", &self.path)
            .field("read_timeout_ms", &self.read_timeout_ms)
            .finish_non_exhaustive()
    }
}

impl HidTransport for UsbTransport {
    type Stream = UsbStream;

    fn open(&self) -> Result<UsbStream> {
        let device = self.api.open_path(&self.path).map_err(|e| {
            tracing::debug!(path = ?self.path, error = %e, "hid open failed");
            KrakenError::OpenFailed
        })?;

        Ok(UsbStream {
            device,
            read_timeout_ms: self.read_timeout_ms,
        })
    }
}

/// An open hidapi device. Closed when dropped.
pub struct UsbStream {
    device: HidDevice,
    read_timeout_ms: i32,
}

impl HidStream for UsbStream {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut buf = [0u8; HID_REPORT_LENGTH];
        let len = data.len().min(HID_REPORT_LENGTH);
        buf[..len].copy_from_slice(&data[..len]);

        self.device.write(&buf)?;
        Ok(())
    }

    fn read(&mut self) -> Result<Vec<u8>> {
        let mut buf = [0u8; HID_REPORT_LENGTH];
        let read = self.device.read_timeout(&mut buf, self.read_timeout_ms)?;
        Ok(buf[..read].to_vec())
    }

    fn close(self) -> Result<()> {
        drop(self.device);
        Ok(())
    }
}

// =============================================================================
// Enumeration
// =============================================================================

/// A connected device matched against the model registry.
#[derive(Debug, Clone)]
pub struct DeviceEntry {
    pub model: &'static ModelSpec,
    pub product_id: u16,
    pub path: CString,
    pub serial: Option<String>,
}

impl DeviceEntry {
    /// Serial used in sensor ids; falls back to the device path.
    pub fn serial_or_path(&self) -> String {
        self.serial
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// List every connected device that a registered model supports.
pub fn supported_devices(api: &HidApi) -> Vec<DeviceEntry> {
    api.device_list()
        .filter(|info| info.vendor_id() == NZXT_VID)
        .filter_map(|info| {
            find_model(info.product_id()).map(|model| DeviceEntry {
                model,
                product_id: info.product_id(),
                path: info.path().to_owned(),
                serial: info.serial_number().map(String::from),
            })
        })
        .collect()
}

/// Pick one device, by serial when given.
///
/// # Errors
/// Returns `DeviceNotFound` if nothing matches.
pub fn select_device(devices: Vec<DeviceEntry>, serial: Option<&str>) -> Result<DeviceEntry> {
    devices
        .into_iter()
        .find(|d| serial.is_none_or(|s| d.serial.as_deref() == Some(s)))
        .ok_or(KrakenError::DeviceNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::models::KRAKEN_Z3;

    fn entry(serial: Option<&str>) -> DeviceEntry {
        DeviceEntry {
            model: &KRAKEN_Z3,
            product_id: 0x3008,
            path: CString::new("/dev/hidraw3").unwrap(),
            serial: serial.map(String::from),
        }
    }

    #[test]
    fn test_serial_or_path() {
        assert_eq!(entry(Some("ABC")).serial_or_path(), "ABC");
        assert_eq!(entry(None).serial_or_path(), "/dev/hidraw3");
        assert_eq!(entry(Some("")).serial_or_path(), "/dev/hidraw3");
    }

    #[test]
    fn test_select_device() {
        let devices = vec![entry(Some("A")), entry(Some("B"))];
        let picked = select_device(devices.clone(), Some("B")).unwrap();
        assert_eq!(picked.serial.as_deref(), Some("B"));

        let first = select_device(devices.clone(), None).unwrap();
        assert_eq!(first.serial.as_deref(), Some("A"));

        assert!(matches!(
            select_device(devices, Some("C")),
            Err(KrakenError::DeviceNotFound)
        ));
        assert!(select_device(Vec::new(), None).is_err());
    }
}
