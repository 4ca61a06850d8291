//! Status LED with background flashing.
//!
//! A [`LedSignal`] exclusively owns one output line. Steady states are
//! written directly; flashing runs in a Tokio task that toggles the line
//! until its [`CancellationToken`] fires.
//!
//! ```text
//!  owner (puzzle)            flash task
//!  ──────────────            ──────────
//!  start_flash ──spawn──────► [initial_delay] → toggle → sleep → toggle ...
//!  stop_flashing ─cancel────► exits at next select or after its write
//!       └── join (bounded) ──┘
//!       └── write Off
//! ```
//!
//! At most one flash task exists per indicator: `start_flash` stops the
//! previous one before spawning, and only the task writes the line while
//! flashing.

use std::sync::Arc;
use std::time::Duration;

use escaperoom_core::PinId;
use escaperoom_core::constants::FLASH_STOP_TIMEOUT;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::error::Result;
use crate::traits::OutputPort;

/// Semantic state of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    Off,
    On,
    Flashing {
        interval: Duration,
        initial_delay: Duration,
    },
}

impl IndicatorState {
    /// Flashing with no initial delay.
    pub fn flashing(interval: Duration) -> Self {
        Self::Flashing {
            interval,
            initial_delay: Duration::ZERO,
        }
    }

    pub fn is_flashing(&self) -> bool {
        matches!(self, Self::Flashing { .. })
    }
}

struct FlashTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// One status LED on one output line.
pub struct LedSignal {
    pin: PinId,
    output: Arc<dyn OutputPort>,
    state: IndicatorState,
    flash: Option<FlashTask>,
    stop_timeout: Duration,
}

impl LedSignal {
    /// Create an indicator in the `Off` state.
    ///
    /// The line is not written until the first command.
    pub fn new(pin: PinId, output: Arc<dyn OutputPort>) -> Self {
        Self {
            pin,
            output,
            state: IndicatorState::Off,
            flash: None,
            stop_timeout: FLASH_STOP_TIMEOUT,
        }
    }

    /// Override how long `stop_flashing` waits for the task to exit.
    pub fn with_stop_timeout(mut self, stop_timeout: Duration) -> Self {
        self.stop_timeout = stop_timeout;
        self
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_some()
    }

    /// Drive the LED steadily on or off.
    ///
    /// A running flash task is stopped first so the task and this write
    /// never race on the line.
    pub async fn set_state(&mut self, on: bool) -> Result<()> {
        self.stop_flashing().await?;
        self.output.write(self.pin, on)?;
        self.state = if on {
            IndicatorState::On
        } else {
            IndicatorState::Off
        };
        Ok(())
    }

    /// Start toggling the LED every `interval` after `initial_delay`.
    ///
    /// Any running flash task is stopped first. The LED starts dark, so the
    /// first toggle after the delay turns it on.
    pub async fn start_flash(&mut self, interval: Duration, initial_delay: Duration) -> Result<()> {
        self.stop_flashing().await?;
        self.output.write(self.pin, false)?;

        debug!(
            pin = %self.pin,
            interval_ms = interval.as_millis() as u64,
            initial_delay_ms = initial_delay.as_millis() as u64,
            "LED start flashing"
        );

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(flash_loop(
            self.pin,
            Arc::clone(&self.output),
            interval,
            initial_delay,
            cancel.clone(),
        ));

        self.flash = Some(FlashTask { cancel, handle });
        self.state = IndicatorState::Flashing {
            interval,
            initial_delay,
        };
        Ok(())
    }

    /// Stop flashing and leave the LED off.
    ///
    /// Waits up to the stop timeout for the task to exit. A task that does
    /// not exit in time is abandoned with a warning. The Off write happens
    /// either way. Does nothing when not flashing.
    pub async fn stop_flashing(&mut self) -> Result<()> {
        let Some(task) = self.flash.take() else {
            return Ok(());
        };

        debug!(pin = %self.pin, "LED stop flashing");
        task.cancel.cancel();

        match tokio::time::timeout(self.stop_timeout, task.handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(pin = %self.pin, error = %e, "LED flash task panicked");
            }
            Err(_) => {
                warn!(
                    pin = %self.pin,
                    timeout_ms = self.stop_timeout.as_millis() as u64,
                    "LED flash task did not stop in time, abandoning it"
                );
            }
        }

        self.state = IndicatorState::Off;
        self.output.write(self.pin, false)
    }

    /// Bring the LED into `state`.
    ///
    /// Does nothing when the LED is already in exactly that state, so a
    /// repeated evaluation does not restart a flash phase.
    pub async fn apply(&mut self, state: IndicatorState) -> Result<()> {
        if state == self.state && (state.is_flashing() == self.is_flashing()) {
            return Ok(());
        }

        match state {
            IndicatorState::Off => self.set_state(false).await,
            IndicatorState::On => self.set_state(true).await,
            IndicatorState::Flashing {
                interval,
                initial_delay,
            } => self.start_flash(interval, initial_delay).await,
        }
    }
}

impl Drop for LedSignal {
    fn drop(&mut self) {
        if let Some(task) = &self.flash {
            task.cancel.cancel();
        }
    }
}

impl std::fmt::Debug for LedSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedSignal")
            .field("pin", &self.pin)
            .field("state", &self.state)
            .field("flashing", &self.is_flashing())
            .finish()
    }
}

async fn flash_loop(
    pin: PinId,
    output: Arc<dyn OutputPort>,
    interval: Duration,
    initial_delay: Duration,
    cancel: CancellationToken,
) {
    if !initial_delay.is_zero() {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(initial_delay) => {}
        }
    }

    let mut lit = false;
    loop {
        lit = !lit;
        if let Err(e) = output.write(pin, lit) {
            error!(pin = %pin, error = %e, "LED flash task stopped on write error");
            return;
        }

        // A write that outlived the stop timeout must not leave the line lit
        // after the owner already forced it off.
        if cancel.is_cancelled() {
            if lit && let Err(e) = output.write(pin, false) {
                error!(pin = %pin, error = %e, "LED flash task could not clear the line");
            }
            return;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
