//! Kraken V3 family device implementation.
//!
//! A [`KrakenDevice`] binds one [`ModelSpec`] to a transport, owns the sensor
//! slots and control channels the model defines, and runs the poll cycle.

use std::rc::Rc;

use tracing::{debug, info};

use crate::device::control::ControlChannel;
use crate::device::models::{ModelSpec, find_model};
use crate::device::transport::{HidStream, HidTransport};
use crate::error::{KrakenError, Result};
use crate::host::{DeviceLogger, SensorContainer, SensorDescriptor, SensorSlot};
use crate::protocol::{BASE_PACKET_LENGTH, Channel, Reading, SensorRole, decode};

// =============================================================================
// Constants
// =============================================================================

/// Attempts per poll cycle. No delay between them.
pub const POLL_ATTEMPTS: usize = 2;

// =============================================================================
// KrakenDevice
// =============================================================================

struct FanChannels<T: HidTransport> {
    speed: SensorSlot,
    control: ControlChannel<T>,
}

/// One attached Kraken cooler.
///
/// Both [`KrakenDevice::update`] and [`KrakenDevice::set_control`] open the
/// transport, use it and close it again before returning. Calls must be
/// serialized by the host.
///
/// # Example
///
/// ```no_run
/// use std::rc::Rc;
/// use hidapi::HidApi;
/// use nzxt_kraken3_driver::device::{KrakenDevice, UsbTransport, select_device, supported_devices};
/// use nzxt_kraken3_driver::host::{SensorList, TracingLogger};
/// use nzxt_kraken3_driver::protocol::Channel;
///
/// let api = Rc::new(HidApi::new()?);
/// let entry = select_device(supported_devices(&api), None)?;
/// let transport = UsbTransport::new(Rc::clone(&api), &entry.path);
///
/// let mut sensors = SensorList::new();
/// let mut kraken = KrakenDevice::attach(
///     entry.product_id,
///     entry.serial_or_path(),
///     transport,
///     Rc::new(TracingLogger),
///     &mut sensors,
/// )?;
///
/// kraken.update();
/// println!("{}", kraken.readings());
///
/// kraken.set_control(Channel::Pump, 80.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct KrakenDevice<T: HidTransport + Clone> {
    model: &'static ModelSpec,
    serial: String,
    transport: T,
    logger: Rc<dyn DeviceLogger>,
    liquid_temperature: SensorSlot,
    pump_speed: SensorSlot,
    pump_control: ControlChannel<T>,
    fan: Option<FanChannels<T>>,
}

impl<T: HidTransport + Clone> KrakenDevice<T> {
    /// Attach the model registered for `product_id`.
    ///
    /// # Errors
    /// Returns `UnsupportedDevice` if no model claims the product id.
    pub fn attach(
        product_id: u16,
        serial: impl Into<String>,
        transport: T,
        logger: Rc<dyn DeviceLogger>,
        container: &mut dyn SensorContainer,
    ) -> Result<Self> {
        let model = find_model(product_id).ok_or(KrakenError::UnsupportedDevice { product_id })?;
        Ok(Self::new(model, serial, transport, logger, container))
    }

    /// Build the device for `model` and register its sensors with `container`.
    pub fn new(
        model: &'static ModelSpec,
        serial: impl Into<String>,
        transport: T,
        logger: Rc<dyn DeviceLogger>,
        container: &mut dyn SensorContainer,
    ) -> Self {
        let serial = serial.into();
        let descriptor = |role: SensorRole| SensorDescriptor {
            id: format!("{}-{}", role.id_prefix(), serial),
            name: format!("{} - {}", role.label(), model.name),
            kind: role.kind(),
        };

        let liquid_temperature = SensorSlot::new(descriptor(SensorRole::LiquidTemperature));
        let pump_speed = SensorSlot::new(descriptor(SensorRole::PumpSpeed));
        let pump_control = ControlChannel::new(
            descriptor(SensorRole::PumpControl),
            f32::from(Channel::Pump.reset_duty()),
            Channel::Pump.min_duty(),
            transport.clone(),
            model.pump_header,
        );

        let fan = model.fan_header.map(|header| FanChannels {
            speed: SensorSlot::new(descriptor(SensorRole::FanSpeed)),
            control: ControlChannel::new(
                descriptor(SensorRole::FanControl),
                f32::from(Channel::Fan.reset_duty()),
                Channel::Fan.min_duty(),
                transport.clone(),
                header,
            ),
        });

        let device = Self {
            model,
            serial,
            transport,
            logger,
            liquid_temperature,
            pump_speed,
            pump_control,
            fan,
        };

        for slot in device.sensors() {
            container.register(slot.descriptor());
        }
        info!(model = model.name, serial = %device.serial, "device attached");

        device
    }

    pub fn model(&self) -> &'static ModelSpec {
        self.model
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    // =========================================================================
    // Polling
    // =========================================================================

    /// Run one poll cycle.
    ///
    /// Up to [`POLL_ATTEMPTS`] open/write/read attempts. The first reply of at
    /// least [`BASE_PACKET_LENGTH`] bytes ends the cycle and is decoded into
    /// the sensor slots; a reply too short for the model's layout updates
    /// nothing. If every attempt fails, one line is
    /// written to the host logger and all sensors keep their previous values.
    pub fn update(&mut self) {
        for attempt in 1..=POLL_ATTEMPTS {
            match self.poll_once() {
                Ok(readings) => {
                    self.apply(&readings);
                    return;
                }
                Err(e) if attempt == POLL_ATTEMPTS => {
                    self.logger.log(&self.failure_message(&e));
                }
                Err(e) => {
                    debug!(model = self.model.name, attempt, error = %e, "poll attempt failed");
                }
            }
        }
    }

    fn poll_once(&self) -> Result<Vec<Reading>> {
        let mut stream = self.transport.open()?;
        let result = self.exchange(&mut stream);
        if let Err(e) = stream.close() {
            debug!(model = self.model.name, error = %e, "close failed");
        }
        result
    }

    fn exchange(&self, stream: &mut T::Stream) -> Result<Vec<Reading>> {
        stream.write(&self.model.poll_request())?;
        let packet = stream.read()?;
        if packet.is_empty() {
            return Err(KrakenError::EmptyResponse);
        }
        if packet.len() < BASE_PACKET_LENGTH {
            return Err(KrakenError::PacketTooShort {
                len: packet.len(),
                min: BASE_PACKET_LENGTH,
            });
        }
        match decode(self.model.layout, &packet) {
            Err(KrakenError::PacketTooShort { len, min }) => {
                debug!(model = self.model.name, len, min, "packet too short for layout");
                Ok(Vec::new())
            }
            result => result,
        }
    }

    fn apply(&mut self, readings: &[Reading]) {
        for reading in readings {
            if let Some(slot) = self.slot_mut(reading.role) {
                slot.set_value(reading.value);
            }
        }
    }

    fn failure_message(&self, error: &KrakenError) -> String {
        let name = self.model.name;
        match error {
            KrakenError::OpenFailed => format!("{name}: Failed to open device after retry"),
            e if e.is_invalid_packet() => format!("{name}: Invalid packet received"),
            e => format!("{name}: Update error - {e}"),
        }
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Set a channel's duty, absorbing any failure.
    ///
    /// Failures are traced at debug level only; the next call is expected to
    /// retry naturally.
    pub fn set_control(&mut self, channel: Channel, value: f32) {
        if let Err(e) = self.try_set_control(channel, value) {
            debug!(model = self.model.name, %channel, error = %e, "set failed");
        }
    }

    /// Set a channel's duty and report the outcome.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a fan on a pump-only model, otherwise the
    /// transport error.
    pub fn try_set_control(&mut self, channel: Channel, value: f32) -> Result<u8> {
        let name = self.model.name;
        self.control_mut(channel)
            .ok_or_else(|| KrakenError::InvalidInput(format!("{name} has no {channel} channel")))?
            .set(value)
    }

    pub fn control(&self, channel: Channel) -> Option<&ControlChannel<T>> {
        match channel {
            Channel::Pump => Some(&self.pump_control),
            Channel::Fan => self.fan.as_ref().map(|f| &f.control),
        }
    }

    fn control_mut(&mut self, channel: Channel) -> Option<&mut ControlChannel<T>> {
        match channel {
            Channel::Pump => Some(&mut self.pump_control),
            Channel::Fan => self.fan.as_mut().map(|f| &mut f.control),
        }
    }

    // =========================================================================
    // Sensors
    // =========================================================================

    /// Every slot this device owns, in registration order.
    pub fn sensors(&self) -> Vec<&SensorSlot> {
        let mut slots = vec![
            &self.liquid_temperature,
            &self.pump_speed,
            self.pump_control.slot(),
        ];
        if let Some(fan) = &self.fan {
            slots.push(&fan.speed);
            slots.push(fan.control.slot());
        }
        slots
    }

    pub fn slot(&self, role: SensorRole) -> Option<&SensorSlot> {
        match role {
            SensorRole::LiquidTemperature => Some(&self.liquid_temperature),
            SensorRole::PumpSpeed => Some(&self.pump_speed),
            SensorRole::PumpControl => Some(self.pump_control.slot()),
            SensorRole::FanSpeed => self.fan.as_ref().map(|f| &f.speed),
            SensorRole::FanControl => self.fan.as_ref().map(|f| f.control.slot()),
        }
    }

    fn slot_mut(&mut self, role: SensorRole) -> Option<&mut SensorSlot> {
        match role {
            SensorRole::LiquidTemperature => Some(&mut self.liquid_temperature),
            SensorRole::PumpSpeed => Some(&mut self.pump_speed),
            SensorRole::PumpControl => Some(self.pump_control.slot_mut()),
            SensorRole::FanSpeed => self.fan.as_mut().map(|f| &mut f.speed),
            SensorRole::FanControl => self.fan.as_mut().map(|f| f.control.slot_mut()),
        }
    }

    /// Last decoded value for `role`.
    pub fn value(&self, role: SensorRole) -> Option<f32> {
        self.slot(role).and_then(SensorSlot::value)
    }

    /// Snapshot of the current values.
    pub fn readings(&self) -> Readings {
        Readings {
            model: self.model.name,
            liquid_temp_c: self.value(SensorRole::LiquidTemperature),
            pump_rpm: self.value(SensorRole::PumpSpeed),
            pump_duty: self.value(SensorRole::PumpControl),
            fan_rpm: self.value(SensorRole::FanSpeed),
            fan_duty: self.value(SensorRole::FanControl),
        }
    }
}

impl<T: HidTransport + Clone> std::fmt::Debug for KrakenDevice<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KrakenDevice")
            .field("model", &self.model.name)
            .field("serial", &self.serial)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Readings
// =============================================================================

/// Current sensor values of one device. `None` means not yet read or not
/// present on this model.
#[derive(Debug, Clone, PartialEq)]
pub struct Readings {
    pub model: &'static str,
    pub liquid_temp_c: Option<f32>,
    pub pump_rpm: Option<f32>,
    pub pump_duty: Option<f32>,
    pub fan_rpm: Option<f32>,
    pub fan_duty: Option<f32>,
}

fn cell(value: Option<f32>, precision: usize) -> String {
    value.map_or_else(|| "--".to_string(), |v| format!("{v:.precision$}"))
}

impl std::fmt::Display for Readings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "+-----------------------------------+")?;
        writeln!(f, "| {:^33} |", format!("NZXT {} Status", self.model))?;
        writeln!(f, "+-----------------------------------+")?;
        writeln!(f, "|  Liquid Temp:   {:>7} C         |", cell(self.liquid_temp_c, 1))?;
        writeln!(f, "+-----------------------------------+")?;
        writeln!(f, "|  Pump Speed:    {:>7} RPM       |", cell(self.pump_rpm, 0))?;
        writeln!(f, "|  Pump Duty:     {:>7} %         |", cell(self.pump_duty, 0))?;
        if self.fan_rpm.is_some() || self.fan_duty.is_some() {
            writeln!(f, "+-----------------------------------+")?;
            writeln!(f, "|  Fan Speed:     {:>7} RPM       |", cell(self.fan_rpm, 0))?;
            writeln!(f, "|  Fan Duty:      {:>7} %         |", cell(self.fan_duty, 0))?;
        }
        writeln!(f, "+-----------------------------------+")?;
        Ok(())
    }
}
