//! The puzzle state machine contract and its enum dispatch.
//!
//! Every puzzle has the same shape: it owns its indicators, is driven only
//! through [`Puzzle::handle`], and reports terminal transitions over the
//! messenger exactly once per transition. The dispatcher runs each puzzle
//! in its own worker task, so `handle` is never re-entered.
//!
//! # Enum Dispatch
//!
//! The trait uses native `async fn` and is therefore not object-safe.
//! [`AnyPuzzle`] gives the dispatcher one concrete type to spawn workers
//! over.

#![allow(async_fn_in_trait)]

use escaperoom_core::{ChallengeId, PinId};
use escaperoom_hardware::{IndicatorState, LedSignal};
use escaperoom_network::Messenger;
use escaperoom_protocol::{Address, OscMessage};
use tracing::{info, warn};

use crate::breaker::BreakerMatch;
use crate::error::Result;
use crate::keypad::KeypadCode;
use crate::result::{PuzzleEvent, PuzzleResult};
use crate::wire::WireDefusal;

/// One physical puzzle.
pub trait Puzzle: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Challenge number this puzzle reports under and resets on.
    fn challenge(&self) -> ChallengeId;

    fn result(&self) -> PuzzleResult;

    /// Input lines whose changes must reach this puzzle.
    fn input_pins(&self) -> Vec<PinId> {
        Vec::new()
    }

    /// Whether key presses must reach this puzzle.
    fn wants_keys(&self) -> bool {
        false
    }

    /// Bring indicators into their startup pattern and evaluate once.
    async fn start(&mut self) -> Result<()>;

    /// React to one event.
    async fn handle(&mut self, event: PuzzleEvent) -> Result<()>;
}

/// Enum wrapper for puzzle dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyPuzzle {
    Breaker(BreakerMatch),
    Wire(WireDefusal),
    Keypad(KeypadCode),
}

impl Puzzle for AnyPuzzle {
    fn name(&self) -> &'static str {
        match self {
            Self::Breaker(p) => p.name(),
            Self::Wire(p) => p.name(),
            Self::Keypad(p) => p.name(),
        }
    }

    fn challenge(&self) -> ChallengeId {
        match self {
            Self::Breaker(p) => p.challenge(),
            Self::Wire(p) => p.challenge(),
            Self::Keypad(p) => p.challenge(),
        }
    }

    fn result(&self) -> PuzzleResult {
        match self {
            Self::Breaker(p) => p.result(),
            Self::Wire(p) => p.result(),
            Self::Keypad(p) => p.result(),
        }
    }

    fn input_pins(&self) -> Vec<PinId> {
        match self {
            Self::Breaker(p) => p.input_pins(),
            Self::Wire(p) => p.input_pins(),
            Self::Keypad(p) => p.input_pins(),
        }
    }

    fn wants_keys(&self) -> bool {
        match self {
            Self::Breaker(p) => p.wants_keys(),
            Self::Wire(p) => p.wants_keys(),
            Self::Keypad(p) => p.wants_keys(),
        }
    }

    async fn start(&mut self) -> Result<()> {
        match self {
            Self::Breaker(p) => p.start().await,
            Self::Wire(p) => p.start().await,
            Self::Keypad(p) => p.start().await,
        }
    }

    async fn handle(&mut self, event: PuzzleEvent) -> Result<()> {
        match self {
            Self::Breaker(p) => p.handle(event).await,
            Self::Wire(p) => p.handle(event).await,
            Self::Keypad(p) => p.handle(event).await,
        }
    }
}

impl From<BreakerMatch> for AnyPuzzle {
    fn from(puzzle: BreakerMatch) -> Self {
        Self::Breaker(puzzle)
    }
}

impl From<WireDefusal> for AnyPuzzle {
    fn from(puzzle: WireDefusal) -> Self {
        Self::Wire(puzzle)
    }
}

impl From<KeypadCode> for AnyPuzzle {
    fn from(puzzle: KeypadCode) -> Self {
        Self::Keypad(puzzle)
    }
}

/// Send one notification, logging instead of failing.
pub(crate) fn notify(messenger: &dyn Messenger, address: Address) {
    let message = OscMessage::notify(address);
    match messenger.send(message) {
        Ok(()) => info!(address = %address, "Notification sent"),
        Err(e) => warn!(address = %address, error = %e, "Notification not sent"),
    }
}

/// Bring one indicator into `state`, logging instead of failing.
///
/// A broken LED line never blocks a puzzle transition.
pub(crate) async fn show(led: &mut LedSignal, state: IndicatorState) {
    if let Err(e) = led.apply(state).await {
        warn!(pin = %led.pin(), ?state, error = %e, "Indicator update failed");
    }
}

/// Drive an indicator low even if it already reads `Off`.
pub(crate) async fn switch_off(led: &mut LedSignal) {
    if let Err(e) = led.set_state(false).await {
        warn!(pin = %led.pin(), error = %e, "Indicator reset failed");
    }
}
