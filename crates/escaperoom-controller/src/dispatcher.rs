//! Event dispatcher.
//!
//! The dispatcher owns one worker task per puzzle. Hardware callbacks and
//! network routes never touch a puzzle directly; they push a
//! [`PuzzleEvent`] into the puzzle's bounded queue and return, so each
//! puzzle's evaluations run strictly one at a time while different puzzles
//! run concurrently.
//!
//! # Architecture
//!
//! ```text
//! InputPort edge ──┐
//! KeypadPort key ──┼──try_send──► [queue] ──► worker(BreakerMatch) ──► LEDs, Messenger
//! Router (reset) ──┘              [queue] ──► worker(WireDefusal)
//!                                 [queue] ──► worker(KeypadCode)
//!                                               ▲
//!          wire result (watch) ──► gate link ───┘ SetEnabled
//!
//! Router (vaultdoor) ──► DoorLock
//! ```
//!
//! A full queue drops an extra `InputChanged`, which is safe because the
//! queued one already triggers a full recompute. Resets are never dropped.

use std::sync::Arc;

use escaperoom_core::{ChallengeId, PinId};
use escaperoom_hardware::{
    InputChangeListener, InputPort, KeyPressListener, KeypadInput, KeypadPort,
};
use escaperoom_protocol::{Address, OscMessage};
use escaperoom_puzzles::{AnyPuzzle, Puzzle, PuzzleEvent, PuzzleResult};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, trace, warn};

use crate::door::DoorLock;
use crate::error::{ControllerError, Result};

/// Index of a registered puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PuzzleId(usize);

/// Snapshot of one puzzle for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleStatus {
    pub name: &'static str,
    pub challenge: ChallengeId,
    pub result: PuzzleResult,
}

/// Hands hardware callbacks to one puzzle's queue.
struct Forwarder {
    name: &'static str,
    tx: mpsc::Sender<PuzzleEvent>,
}

impl InputChangeListener for Forwarder {
    fn on_input_change(&self, pin: PinId) {
        match self.tx.try_send(PuzzleEvent::InputChanged(pin)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                trace!(puzzle = self.name, pin = %pin, "Queue full, input change conflated");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(puzzle = self.name, pin = %pin, "Worker gone, input change dropped");
            }
        }
    }
}

impl KeyPressListener for Forwarder {
    fn on_key_press(&self, key: KeypadInput) {
        match self.tx.try_send(PuzzleEvent::Key(key)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(puzzle = self.name, key = %key.as_char(), "Queue full, key press dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(puzzle = self.name, "Worker gone, key press dropped");
            }
        }
    }
}

struct PuzzleHandle {
    name: &'static str,
    challenge: ChallengeId,
    tx: mpsc::Sender<PuzzleEvent>,
    result: watch::Receiver<PuzzleResult>,
}

/// Routes inbound show-control messages.
///
/// Cheap to clone; the network receive loop holds one.
#[derive(Clone)]
pub struct Router {
    targets: Arc<Vec<(ChallengeId, &'static str, mpsc::Sender<PuzzleEvent>)>>,
    door: Option<Arc<DoorLock>>,
}

impl Router {
    /// Deliver one inbound message.
    ///
    /// Unknown and outbound-only addresses are ignored. Door failures are
    /// logged.
    pub fn route(&self, message: &OscMessage) {
        let address = match message.route() {
            Ok(address) if address.is_inbound() => address,
            Ok(_) | Err(_) => {
                debug!(address = %message.address, "Ignoring unrouted message");
                return;
            }
        };

        match address {
            Address::Reset(challenge) => self.reset(challenge),
            Address::VaultUnlock => self.door(|door| door.unlock()),
            Address::VaultLock => self.door(|door| door.lock()),
            _ => {}
        }
    }

    fn reset(&self, challenge: ChallengeId) {
        let mut matched = 0;
        for (_, name, tx) in self.targets.iter().filter(|(c, ..)| *c == challenge) {
            matched += 1;
            match tx.try_send(PuzzleEvent::Reset) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(event)) => {
                    // Wait for room off the receive loop.
                    let tx = tx.clone();
                    let name = *name;
                    tokio::spawn(async move {
                        if tx.send(event).await.is_err() {
                            debug!(puzzle = name, "Worker gone, reset dropped");
                        }
                    });
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(puzzle = *name, "Worker gone, reset dropped");
                }
            }
        }

        if matched == 0 {
            warn!(challenge = %challenge, "Reset for unknown challenge");
        } else {
            info!(challenge = %challenge, puzzles = matched, "Reset requested");
        }
    }

    fn door(&self, command: impl FnOnce(&DoorLock) -> escaperoom_hardware::Result<()>) {
        match &self.door {
            Some(door) => {
                if let Err(e) = command(door) {
                    error!(pin = %door.pin(), error = %e, "Door command failed");
                }
            }
            None => warn!("Door command received but no door is configured"),
        }
    }
}

/// Owns the puzzle workers and their wiring.
pub struct Dispatcher {
    handles: Vec<PuzzleHandle>,
    door: Option<Arc<DoorLock>>,
    queue_capacity: usize,
    tasks: JoinSet<()>,
}

impl Dispatcher {
    /// Create an empty dispatcher. `queue_capacity` is clamped to at least 1.
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            handles: Vec::new(),
            door: None,
            queue_capacity: queue_capacity.max(1),
            tasks: JoinSet::new(),
        }
    }

    pub fn with_door(mut self, door: DoorLock) -> Self {
        self.door = Some(Arc::new(door));
        self
    }

    /// Spawn a worker for `puzzle` and subscribe its inputs.
    ///
    /// The worker runs the puzzle's startup evaluation first, then handles
    /// queued events in order. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    /// Returns an error if a port refuses the subscription. The puzzle is not
    /// started in that case.
    pub fn register(
        &mut self,
        puzzle: AnyPuzzle,
        input: &dyn InputPort,
        keypad: &dyn KeypadPort,
    ) -> Result<PuzzleId> {
        let name = puzzle.name();
        let challenge = puzzle.challenge();
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let (result_tx, result_rx) = watch::channel(puzzle.result());

        let forwarder = Arc::new(Forwarder {
            name,
            tx: tx.clone(),
        });
        for pin in puzzle.input_pins() {
            input.subscribe(pin, forwarder.clone())?;
        }
        if puzzle.wants_keys() {
            keypad.subscribe(forwarder)?;
        }

        info!(puzzle = name, challenge = %challenge, "Puzzle registered");
        self.tasks.spawn(run_worker(puzzle, rx, result_tx));

        let id = PuzzleId(self.handles.len());
        self.handles.push(PuzzleHandle {
            name,
            challenge,
            tx,
            result: result_rx,
        });
        Ok(id)
    }

    /// Enable `target` exactly while `gate` is solved.
    ///
    /// # Errors
    /// Returns an error if either id is unknown.
    pub fn link_gate(&mut self, gate: PuzzleId, target: PuzzleId) -> Result<()> {
        let gate_rx = self.handle(gate)?.result.clone();
        let target_tx = self.handle(target)?.tx.clone();
        self.tasks.spawn(run_gate(gate_rx, target_tx));
        Ok(())
    }

    /// Router for inbound messages.
    pub fn router(&self) -> Router {
        Router {
            targets: Arc::new(
                self.handles
                    .iter()
                    .map(|h| (h.challenge, h.name, h.tx.clone()))
                    .collect(),
            ),
            door: self.door.clone(),
        }
    }

    /// Deliver one inbound message. Same as `self.router().route(message)`.
    pub fn route(&self, message: &OscMessage) {
        self.router().route(message);
    }

    pub fn door(&self) -> Option<&DoorLock> {
        self.door.as_deref()
    }

    /// Current result of every puzzle, in registration order.
    pub fn results(&self) -> Vec<PuzzleStatus> {
        self.handles
            .iter()
            .map(|h| PuzzleStatus {
                name: h.name,
                challenge: h.challenge,
                result: *h.result.borrow(),
            })
            .collect()
    }

    /// Id of the first puzzle registered under `name`.
    pub fn puzzle_id(&self, name: &str) -> Option<PuzzleId> {
        self.handles.iter().position(|h| h.name == name).map(PuzzleId)
    }

    /// Watch one puzzle's result.
    ///
    /// # Errors
    /// Returns an error if the id is unknown.
    pub fn watch_result(&self, id: PuzzleId) -> Result<watch::Receiver<PuzzleResult>> {
        Ok(self.handle(id)?.result.clone())
    }

    /// Abort every worker and link task and wait for them to finish.
    ///
    /// Dropping a worker drops its puzzle, which cancels any flash tasks.
    pub async fn shutdown(mut self) {
        self.tasks.abort_all();

        let mut panics = 0;
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result
                && e.is_panic()
            {
                panics += 1;
            }
        }

        if panics > 0 {
            warn!(panics, "Dispatcher stopped with panicked tasks");
        } else {
            info!("Dispatcher stopped");
        }
    }

    fn handle(&self, id: PuzzleId) -> Result<&PuzzleHandle> {
        self.handles
            .get(id.0)
            .ok_or_else(|| ControllerError::invalid_config(format!("unknown puzzle #{}", id.0)))
    }
}

async fn run_worker(
    mut puzzle: AnyPuzzle,
    mut rx: mpsc::Receiver<PuzzleEvent>,
    result_tx: watch::Sender<PuzzleResult>,
) {
    let name = puzzle.name();

    if let Err(e) = puzzle.start().await {
        error!(puzzle = name, error = %e, "Startup evaluation failed");
    }
    publish(&result_tx, puzzle.result());

    while let Some(event) = rx.recv().await {
        trace!(puzzle = name, ?event, "Handling event");
        if let Err(e) = puzzle.handle(event).await {
            warn!(puzzle = name, ?event, error = %e, "Event handling failed");
        }
        publish(&result_tx, puzzle.result());
    }

    debug!(puzzle = name, "Worker stopped");
}

fn publish(tx: &watch::Sender<PuzzleResult>, result: PuzzleResult) {
    tx.send_if_modified(|current| {
        if *current == result {
            return false;
        }
        *current = result;
        true
    });
}

async fn run_gate(mut gate: watch::Receiver<PuzzleResult>, target: mpsc::Sender<PuzzleEvent>) {
    loop {
        let enabled = *gate.borrow_and_update() == PuzzleResult::Success;
        if target.send(PuzzleEvent::SetEnabled(enabled)).await.is_err() {
            return;
        }
        if gate.changed().await.is_err() {
            return;
        }
    }
}
