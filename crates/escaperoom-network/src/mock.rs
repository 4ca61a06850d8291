//! Recording messenger for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use escaperoom_protocol::OscMessage;
use parking_lot::Mutex;

use crate::error::NetworkError;
use crate::messenger::Messenger;

/// [`Messenger`] that records every message instead of sending it.
///
/// Cloning shares the record.
#[derive(Debug, Clone, Default)]
pub struct MockMessenger {
    sent: Arc<Mutex<Vec<OscMessage>>>,
    failing: Arc<AtomicBool>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message sent so far, oldest first.
    pub fn sent(&self) -> Vec<OscMessage> {
        self.sent.lock().clone()
    }

    /// Addresses of every message sent so far.
    pub fn addresses(&self) -> Vec<String> {
        self.sent.lock().iter().map(|m| m.address.clone()).collect()
    }

    /// Number of messages sent to `address`.
    pub fn count(&self, address: &str) -> usize {
        self.sent
            .lock()
            .iter()
            .filter(|m| m.address == address)
            .count()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }

    /// Make later sends fail (nothing is recorded while failing).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Messenger for MockMessenger {
    fn send(&self, message: OscMessage) -> Result<(), NetworkError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NetworkError::Io(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                "simulated send failure",
            )));
        }
        self.sent.lock().push(message);
        Ok(())
    }
}
