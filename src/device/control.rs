//! Speed control for a single pump or fan channel.

use crate::device::transport::{HidStream, HidTransport};
use crate::error::Result;
use crate::host::{SensorDescriptor, SensorSlot};
use crate::protocol::{ChannelHeader, CommandPacket, clamp_duty};

/// Owns the speed command for one channel and the slot showing its duty.
///
/// The command's header is fixed at construction; every [`ControlChannel::set`]
/// rewrites only the duty bytes.
#[derive(Debug)]
pub struct ControlChannel<T: HidTransport> {
    slot: SensorSlot,
    reset_value: f32,
    min_value: u8,
    transport: T,
    packet: CommandPacket,
}

impl<T: HidTransport> ControlChannel<T> {
    pub fn new(
        descriptor: SensorDescriptor,
        reset_value: f32,
        min_value: u8,
        transport: T,
        header: ChannelHeader,
    ) -> Self {
        Self {
            slot: SensorSlot::new(descriptor),
            reset_value,
            min_value,
            transport,
            packet: CommandPacket::new(header),
        }
    }

    /// Clamp `value` into `[min_value, 100]` and send it to the device.
    ///
    /// Opens the transport, writes the 44-byte command once and closes it.
    /// No retry.
    ///
    /// # Returns
    /// The duty actually written.
    ///
    /// # Errors
    /// Returns the transport error if opening or writing fails. The stream is
    /// closed before a write error is returned.
    pub fn set(&mut self, value: f32) -> Result<u8> {
        let duty = clamp_duty(value, self.min_value);
        self.packet.set_duty(duty);

        let mut stream = self.transport.open()?;
        let written = stream.write(self.packet.as_bytes());
        let closed = stream.close();
        written?;
        closed?;

        Ok(duty)
    }

    /// Duty the host should restore when it releases control.
    pub fn reset_value(&self) -> f32 {
        self.reset_value
    }

    pub fn min_value(&self) -> u8 {
        self.min_value
    }

    pub fn header(&self) -> ChannelHeader {
        self.packet.header()
    }

    pub fn packet(&self) -> &CommandPacket {
        &self.packet
    }

    /// Duty last reported by the device.
    pub fn slot(&self) -> &SensorSlot {
        &self.slot
    }

    pub(crate) fn slot_mut(&mut self) -> &mut SensorSlot {
        &mut self.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::MockTransport;
    use crate::error::KrakenError;
    use crate::host::SensorKind;
    use crate::protocol::{CMD_SET_SPEED, COMMAND_PACKET_LENGTH};

    fn pump(transport: &MockTransport) -> ControlChannel<MockTransport> {
        let descriptor = SensorDescriptor {
            id: "pumpcontrol-TEST".into(),
            name: "Pump - Kraken Elite".into(),
            kind: SensorKind::Control,
        };
        ControlChannel::new(descriptor, 60.0, 20, transport.clone(), [0x01, 0x01, 0x00])
    }

    #[test]
    fn test_set_writes_full_command() {
        let transport = MockTransport::new();
        let mut channel = pump(&transport);

        assert_eq!(channel.set(55.7).unwrap(), 55);

        let writes = transport.writes();
        assert_eq!(writes.len(), 1);
        let cmd = &writes[0];
        assert_eq!(cmd.len(), COMMAND_PACKET_LENGTH);
        assert_eq!(cmd[0], CMD_SET_SPEED);
        assert_eq!(&cmd[1..4], &[0x01, 0x01, 0x00]);
        assert!(cmd[4..].iter().all(|&d| d == 55));
        assert_eq!(transport.open_count(), 1);
        assert_eq!(transport.close_count(), 1);
    }

    #[test]
    fn test_set_clamps_to_channel_range() {
        let transport = MockTransport::new();
        let mut channel = pump(&transport);

        assert_eq!(channel.set(5.0).unwrap(), 20);
        assert_eq!(channel.set(250.0).unwrap(), 100);
        assert_eq!(channel.set(-1.0).unwrap(), 20);

        let duties: Vec<u8> = transport.writes().iter().map(|w| w[4]).collect();
        assert_eq!(duties, vec![20, 100, 20]);
    }

    #[test]
    fn test_header_unchanged_after_sets() {
        let transport = MockTransport::new();
        let mut channel = pump(&transport);
        for v in [0.0, 33.3, 100.0, 1000.0] {
            channel.set(v).unwrap();
            assert_eq!(channel.header(), [0x01, 0x01, 0x00]);
        }
    }

    #[test]
    fn test_open_failure_is_reported() {
        let transport = MockTransport::new();
        transport.script_opens(&[false]);
        let mut channel = pump(&transport);

        assert!(matches!(channel.set(50.0), Err(KrakenError::OpenFailed)));
        assert!(transport.writes().is_empty());
        assert_eq!(transport.close_count(), 0);
    }

    #[test]
    fn test_write_failure_still_closes() {
        let transport = MockTransport::new();
        transport.fail_writes(true);
        let mut channel = pump(&transport);

        assert!(matches!(channel.set(50.0), Err(KrakenError::HidError(_))));
        assert_eq!(transport.close_count(), 1);
    }

    #[test]
    fn test_defaults() {
        let transport = MockTransport::new();
        let channel = pump(&transport);
        assert_eq!(channel.reset_value(), 60.0);
        assert_eq!(channel.min_value(), 20);
        assert_eq!(channel.slot().value(), None);
    }
}
