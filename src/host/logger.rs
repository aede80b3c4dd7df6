//! Logger sink handed to a device by the host.

/// Free-text diagnostic sink.
///
/// Devices write here only when a poll cycle fails for good; transient
/// failures go to `tracing` at debug level instead.
pub trait DeviceLogger {
    fn log(&self, message: &str);
}

/// Forwards every line to `tracing` as a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl DeviceLogger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::warn!(target: "kraken3", "{message}");
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl DeviceLogger for NullLogger {
    fn log(&self, _message: &str) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::DeviceLogger;
    use std::cell::RefCell;

    /// Keeps every line for later assertions.
    #[derive(Debug, Default)]
    pub struct RecordingLogger {
        lines: RefCell<Vec<String>>,
    }

    impl RecordingLogger {
        pub fn lines(&self) -> Vec<String> {
            self.lines.borrow().clone()
        }
    }

    impl DeviceLogger for RecordingLogger {
        fn log(&self, message: &str) {
            self.lines.borrow_mut().push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingLogger;
    use super::*;

    #[test]
    fn test_recording_logger_keeps_order() {
        let logger = RecordingLogger::default();
        logger.log("first");
        logger.log("second");
        assert_eq!(logger.lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_tracing_logger_does_not_panic_without_subscriber() {
        TracingLogger.log("no subscriber installed");
        NullLogger.log("dropped");
    }
}
