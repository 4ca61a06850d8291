//! Mock GPIO board.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use escaperoom_core::PinId;
use parking_lot::Mutex;
use tracing::trace;

use crate::error::{HardwareError, Result};
use crate::traits::{InputChangeListener, InputPort, OutputPort};

#[derive(Default)]
struct BoardState {
    inputs: HashMap<PinId, bool>,
    outputs: HashMap<PinId, bool>,
    writes: HashMap<PinId, Vec<bool>>,
    listeners: HashMap<PinId, Vec<Arc<dyn InputChangeListener>>>,
    failing: HashSet<PinId>,
}

/// Simulated GPIO header.
///
/// Cloning shares the same board. Inputs are driven with [`set_input`],
/// which fires the subscribed listeners the way an edge interrupt would.
/// Every output write is recorded for inspection.
///
/// [`set_input`]: MockBoard::set_input
#[derive(Clone, Default)]
pub struct MockBoard {
    state: Arc<Mutex<BoardState>>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an input level and notify its listeners.
    ///
    /// Listeners are called after the board lock is released so they may
    /// read the board back.
    pub fn set_input(&self, pin: PinId, level: bool) {
        let listeners = {
            let mut state = self.state.lock();
            state.inputs.insert(pin, level);
            state.listeners.get(&pin).cloned().unwrap_or_default()
        };

        trace!(pin = %pin, level, listeners = listeners.len(), "Mock input change");
        for listener in listeners {
            listener.on_input_change(pin);
        }
    }

    /// Set an input level without firing listeners.
    pub fn preset_input(&self, pin: PinId, level: bool) {
        self.state.lock().inputs.insert(pin, level);
    }

    /// Last level written to an output, if any.
    pub fn output(&self, pin: PinId) -> Option<bool> {
        self.state.lock().outputs.get(&pin).copied()
    }

    /// Every level written to an output, oldest first.
    pub fn writes(&self, pin: PinId) -> Vec<bool> {
        self.state
            .lock()
            .writes
            .get(&pin)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every later write to `pin` fail.
    pub fn fail_writes(&self, pin: PinId) {
        self.state.lock().failing.insert(pin);
    }

    /// Number of listeners subscribed to `pin`.
    pub fn listener_count(&self, pin: PinId) -> usize {
        self.state
            .lock()
            .listeners
            .get(&pin)
            .map_or(0, Vec::len)
    }
}

impl InputPort for MockBoard {
    fn read(&self, pin: PinId) -> Result<bool> {
        Ok(self.state.lock().inputs.get(&pin).copied().unwrap_or(false))
    }

    fn subscribe(&self, pin: PinId, listener: Arc<dyn InputChangeListener>) -> Result<()> {
        self.state
            .lock()
            .listeners
            .entry(pin)
            .or_default()
            .push(listener);
        Ok(())
    }
}

impl OutputPort for MockBoard {
    fn write(&self, pin: PinId, level: bool) -> Result<()> {
        let mut state = self.state.lock();
        if state.failing.contains(&pin) {
            return Err(HardwareError::write_failed(pin, "simulated fault"));
        }
        state.outputs.insert(pin, level);
        state.writes.entry(pin).or_default().push(level);
        Ok(())
    }
}

impl std::fmt::Debug for MockBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockBoard")
            .field("inputs", &state.inputs)
            .field("outputs", &state.outputs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pin(n: u8) -> PinId {
        PinId::new(n).unwrap()
    }

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl InputChangeListener for Counter {
        fn on_input_change(&self, _pin: PinId) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_unknown_input_reads_low() {
        let board = MockBoard::new();
        assert!(!board.read(pin(17)).unwrap());
    }

    #[test]
    fn test_set_input_fires_listeners() {
        let board = MockBoard::new();
        let counter = Arc::new(Counter::default());
        board.subscribe(pin(4), counter.clone()).unwrap();

        board.set_input(pin(4), true);
        board.set_input(pin(14), true);

        assert!(board.read(pin(4)).unwrap());
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_preset_input_is_silent() {
        let board = MockBoard::new();
        let counter = Arc::new(Counter::default());
        board.subscribe(pin(9), counter.clone()).unwrap();

        board.preset_input(pin(9), true);

        assert!(board.read(pin(9)).unwrap());
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_writes_are_recorded() {
        let board = MockBoard::new();
        board.write(pin(19), true).unwrap();
        board.write(pin(19), false).unwrap();

        assert_eq!(board.output(pin(19)), Some(false));
        assert_eq!(board.writes(pin(19)), vec![true, false]);
        assert_eq!(board.output(pin(16)), None);
    }

    #[test]
    fn test_failing_pin() {
        let board = MockBoard::new();
        board.fail_writes(pin(4));

        let err = board.write(pin(4), true).unwrap_err();
        assert!(matches!(err, HardwareError::WriteFailed { .. }));
        assert!(board.writes(pin(4)).is_empty());
    }
}
