//! Scripted in-memory transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::device::transport::{HidStream, HidTransport};
use crate::error::{KrakenError, Result};

/// Outcome of one scripted read.
#[derive(Debug, Clone)]
pub enum MockRead {
    Packet(Vec<u8>),
    Fail(&'static str),
}

#[derive(Debug, Default)]
struct MockState {
    opens: VecDeque<bool>,
    reads: VecDeque<MockRead>,
    fail_writes: bool,
    writes: Vec<Vec<u8>>,
    open_count: usize,
    close_count: usize,
}

/// Cloneable handle sharing one script between a device and its channels.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Rc<RefCell<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue open outcomes; once exhausted every open succeeds.
    pub fn script_opens(&self, outcomes: &[bool]) {
        self.state.borrow_mut().opens.extend(outcomes.iter().copied());
    }

    /// Queue read outcomes; once exhausted reads return an empty report.
    pub fn script_reads(&self, reads: impl IntoIterator<Item = MockRead>) {
        self.state.borrow_mut().reads.extend(reads);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.borrow().writes.clone()
    }

    pub fn open_count(&self) -> usize {
        self.state.borrow().open_count
    }

    pub fn close_count(&self) -> usize {
        self.state.borrow().close_count
    }
}

impl HidTransport for MockTransport {
    type Stream = MockStream;

    fn open(&self) -> Result<MockStream> {
        let mut state = self.state.borrow_mut();
        state.open_count += 1;
        if state.opens.pop_front().unwrap_or(true) {
            Ok(MockStream {
                state: Rc::clone(&self.state),
            })
        } else {
            Err(KrakenError::OpenFailed)
        }
    }
}

#[derive(Debug)]
pub struct MockStream {
    state: Rc<RefCell<MockState>>,
}

fn disconnected(message: &str) -> KrakenError {
    KrakenError::HidError(hidapi::HidError::HidApiError {
        message: message.to_string(),
    })
}

impl HidStream for MockStream {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(disconnected("write failed"));
        }
        state.writes.push(data.to_vec());
        Ok(())
    }

    fn read(&mut self) -> Result<Vec<u8>> {
        match self.state.borrow_mut().reads.pop_front() {
            Some(MockRead::Packet(packet)) => Ok(packet),
            Some(MockRead::Fail(message)) => Err(disconnected(message)),
            None => Ok(Vec::new()),
        }
    }

    fn close(self) -> Result<()> {
        self.state.borrow_mut().close_count += 1;
        Ok(())
    }
}
