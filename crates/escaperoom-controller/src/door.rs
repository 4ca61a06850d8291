use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use escaperoom_core::PinId;
use escaperoom_hardware::{OutputPort, Result};
use tracing::info;

use crate::config::DoorConfig;

/// Electromagnetic vault door on one relay line.
///
/// Unlock drives the configured unlock level, lock drives the opposite.
pub struct DoorLock {
    pin: PinId,
    unlock_level: bool,
    locked: AtomicBool,
    output: Arc<dyn OutputPort>,
}

impl DoorLock {
    /// Create the lock without touching the line.
    pub fn new(config: DoorConfig, output: Arc<dyn OutputPort>) -> Self {
        Self {
            pin: config.pin,
            unlock_level: config.unlock_level,
            locked: AtomicBool::new(false),
            output,
        }
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    /// Release the door.
    ///
    /// # Errors
    /// Returns an error if the relay line cannot be written.
    pub fn unlock(&self) -> Result<()> {
        self.output.write(self.pin, self.unlock_level)?;
        self.locked.store(false, Ordering::SeqCst);
        info!(pin = %self.pin, "Vault door unlocked");
        Ok(())
    }

    /// Engage the door.
    ///
    /// # Errors
    /// Returns an error if the relay line cannot be written.
    pub fn lock(&self) -> Result<()> {
        self.output.write(self.pin, !self.unlock_level)?;
        self.locked.store(true, Ordering::SeqCst);
        info!(pin = %self.pin, "Vault door locked");
        Ok(())
    }

    /// Whether the last successful command was `lock`.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for DoorLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoorLock")
            .field("pin", &self.pin)
            .field("unlock_level", &self.unlock_level)
            .field("locked", &self.is_locked())
            .finish()
    }
}
