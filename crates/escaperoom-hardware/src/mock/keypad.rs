//! Mock matrix keypad.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::Result;
use crate::traits::{KeyPressListener, KeypadInput, KeypadPort};

/// Simulated keypad that delivers presses on demand.
///
/// Cloning shares the listener list.
#[derive(Clone, Default)]
pub struct MockKeypad {
    listeners: Arc<Mutex<Vec<Arc<dyn KeyPressListener>>>>,
}

impl MockKeypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one key press to every listener.
    pub fn press(&self, key: KeypadInput) {
        let listeners = self.listeners.lock().clone();
        trace!(key = %key.as_char(), "Mock key press");
        for listener in listeners {
            listener.on_key_press(key);
        }
    }

    /// Press each key of `keys` in order.
    ///
    /// # Errors
    ///
    /// Returns an error at the first character that is not on the keypad.
    /// Keys before it have already been pressed.
    pub fn press_sequence(&self, keys: &str) -> Result<()> {
        for c in keys.chars() {
            self.press(KeypadInput::from_char(c)?);
        }
        Ok(())
    }
}

impl KeypadPort for MockKeypad {
    fn subscribe(&self, listener: Arc<dyn KeyPressListener>) -> Result<()> {
        self.listeners.lock().push(listener);
        Ok(())
    }
}

impl std::fmt::Debug for MockKeypad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockKeypad")
            .field("listeners", &self.listeners.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<KeypadInput>>);

    impl KeyPressListener for Recorder {
        fn on_key_press(&self, key: KeypadInput) {
            self.0.lock().push(key);
        }
    }

    #[test]
    fn test_press_sequence() {
        let keypad = MockKeypad::new();
        let recorder = Arc::new(Recorder::default());
        keypad.subscribe(recorder.clone()).unwrap();

        keypad.press_sequence("81*4#").unwrap();

        assert_eq!(
            *recorder.0.lock(),
            vec![
                KeypadInput::Digit(8),
                KeypadInput::Digit(1),
                KeypadInput::Star,
                KeypadInput::Digit(4),
                KeypadInput::Hash,
            ]
        );
    }

    #[test]
    fn test_press_sequence_stops_at_bad_key() {
        let keypad = MockKeypad::new();
        let recorder = Arc::new(Recorder::default());
        keypad.subscribe(recorder.clone()).unwrap();

        assert!(keypad.press_sequence("1x2").is_err());
        assert_eq!(*recorder.0.lock(), vec![KeypadInput::Digit(1)]);
    }
}
