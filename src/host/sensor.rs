//! Sensor slots and the container the host registers them in.

use std::fmt;

/// Which host collection a sensor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Temperature in Celsius.
    Temperature,
    /// Rotational speed in RPM.
    Fan,
    /// Controllable output in percent.
    Control,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Temperature => write!(f, "Temperature"),
            SensorKind::Fan => write!(f, "Fan"),
            SensorKind::Control => write!(f, "Control"),
        }
    }
}

/// Identity of a sensor as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SensorDescriptor {
    /// Stable id, e.g. `pumprpm-<serial>`.
    pub id: String,
    /// Display name, e.g. `Pump - Kraken Z3`.
    pub name: String,
    pub kind: SensorKind,
}

/// A named value updated in place on every successful poll.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSlot {
    descriptor: SensorDescriptor,
    value: Option<f32>,
}

impl SensorSlot {
    pub fn new(descriptor: SensorDescriptor) -> Self {
        Self {
            descriptor,
            value: None,
        }
    }

    pub fn descriptor(&self) -> &SensorDescriptor {
        &self.descriptor
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    /// Last decoded value, `None` until the first successful poll.
    pub fn value(&self) -> Option<f32> {
        self.value
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = Some(value);
    }
}

/// Host-side sensor registration.
pub trait SensorContainer {
    /// Called once per sensor when a device is attached.
    fn register(&mut self, descriptor: &SensorDescriptor);
}

/// A plain list container, enough for the CLI.
#[derive(Debug, Default, Clone)]
pub struct SensorList {
    sensors: Vec<SensorDescriptor>,
}

impl SensorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorDescriptor> {
        self.sensors.iter()
    }

    pub fn of_kind(&self, kind: SensorKind) -> impl Iterator<Item = &SensorDescriptor> {
        self.sensors.iter().filter(move |s| s.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}

impl SensorContainer for SensorList {
    fn register(&mut self, descriptor: &SensorDescriptor) {
        self.sensors.push(descriptor.clone());
    }
}
