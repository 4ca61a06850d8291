//! Keypad code puzzle.
//!
//! ```text
//!            SetEnabled(true)
//!   Idle ───────────────────► Collecting ──code ok──► Success
//!    ▲                          │    ▲
//!    └──── SetEnabled(false) ───┘    │ wrong, strikes < max
//!                                    │   (keypad/incorrect)
//!                                    └──┘
//!                          wrong, strikes == max ──► Failure
//! ```
//!
//! Whether the keypad is enabled belongs to whoever gates it (the wire
//! puzzle in the installed room); a reset clears entry, strikes and result
//! but leaves the gate alone.

use std::sync::Arc;

use escaperoom_core::ChallengeId;
use escaperoom_hardware::KeypadInput;
use escaperoom_network::Messenger;
use escaperoom_protocol::Address;
use tracing::{debug, info};

use crate::config::{KeypadConfig, KeypadPuzzleConfig};
use crate::error::Result;
use crate::puzzle::{Puzzle, notify};
use crate::result::{PuzzleEvent, PuzzleResult};

/// Code entry state machine.
pub struct KeypadCode {
    challenge: ChallengeId,
    config: KeypadConfig,
    enabled: bool,
    buffer: String,
    strikes: u32,
    result: PuzzleResult,
    messenger: Arc<dyn Messenger>,
}

impl KeypadCode {
    /// Create a disabled keypad.
    pub fn new(config: KeypadPuzzleConfig, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            challenge: config.challenge,
            buffer: String::with_capacity(config.keypad.code.len()),
            config: config.keypad,
            enabled: false,
            strikes: 0,
            result: PuzzleResult::Pending,
            messenger,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Digits entered since the last judgment or clear.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn strikes(&self) -> u32 {
        self.strikes
    }

    fn press(&mut self, key: KeypadInput) {
        if !self.enabled || self.result.is_terminal() {
            debug!(challenge = %self.challenge, key = %key.as_char(), "Key ignored");
            return;
        }

        if key.is_clear() {
            self.buffer.clear();
            return;
        }
        let Some(digit) = key.as_digit() else {
            return;
        };

        self.buffer.push(char::from(b'0' + digit));
        if self.buffer.len() < self.config.code.len() {
            return;
        }

        let correct = self.buffer == self.config.code;
        self.buffer.clear();

        if correct {
            self.result = PuzzleResult::Success;
            info!(challenge = %self.challenge, "Keypad code accepted");
            notify(self.messenger.as_ref(), Address::Success(self.challenge));
            return;
        }

        self.strikes += 1;
        if self.strikes >= self.config.max_strikes {
            self.result = PuzzleResult::Failure;
            info!(challenge = %self.challenge, strikes = self.strikes, "Keypad locked out");
            notify(self.messenger.as_ref(), Address::Failure(self.challenge));
        } else {
            info!(
                challenge = %self.challenge,
                strikes = self.strikes,
                max_strikes = self.config.max_strikes,
                "Keypad code rejected"
            );
            notify(self.messenger.as_ref(), Address::KeypadIncorrect(self.challenge));
        }
    }

    fn reset(&mut self) {
        info!(challenge = %self.challenge, enabled = self.enabled, "Keypad reset");
        self.buffer.clear();
        self.strikes = 0;
        self.result = PuzzleResult::Pending;
    }
}

impl Puzzle for KeypadCode {
    fn name(&self) -> &'static str {
        "keypad"
    }

    fn challenge(&self) -> ChallengeId {
        self.challenge
    }

    fn result(&self) -> PuzzleResult {
        self.result
    }

    fn wants_keys(&self) -> bool {
        true
    }

    async fn start(&mut self) -> Result<()> {
        Ok(())
    }

    async fn handle(&mut self, event: PuzzleEvent) -> Result<()> {
        match event {
            PuzzleEvent::Key(key) => self.press(key),
            PuzzleEvent::SetEnabled(enabled) => {
                if enabled != self.enabled {
                    debug!(challenge = %self.challenge, enabled, "Keypad gate changed");
                    self.enabled = enabled;
                    self.buffer.clear();
                }
            }
            PuzzleEvent::Reset => self.reset(),
            _ => {}
        }
        Ok(())
    }
}

impl std::fmt::Debug for KeypadCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The code itself stays out of logs.
        f.debug_struct("KeypadCode")
            .field("challenge", &self.challenge)
            .field("enabled", &self.enabled)
            .field("entered", &self.buffer.len())
            .field("strikes", &self.strikes)
            .field("result", &self.result)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escaperoom_network::MockMessenger;
    use rstest::rstest;

    const SUCCESS: &str = "/escaperoom/challenge/4/success";
    const FAILURE: &str = "/escaperoom/challenge/4/failure";
    const INCORRECT: &str = "/escaperoom/challenge/4/keypad/incorrect";

    fn setup() -> (KeypadCode, MockMessenger) {
        let messenger = MockMessenger::new();
        let puzzle = KeypadCode::new(KeypadPuzzleConfig::default(), Arc::new(messenger.clone()));
        (puzzle, messenger)
    }

    async fn enabled() -> (KeypadCode, MockMessenger) {
        let (mut puzzle, messenger) = setup();
        puzzle.handle(PuzzleEvent::SetEnabled(true)).await.unwrap();
        (puzzle, messenger)
    }

    async fn enter(puzzle: &mut KeypadCode, keys: &str) {
        for c in keys.chars() {
            let key = KeypadInput::from_char(c).unwrap();
            puzzle.handle(PuzzleEvent::Key(key)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_correct_code() {
        let (mut puzzle, messenger) = enabled().await;

        enter(&mut puzzle, "8140").await;

        assert_eq!(puzzle.result(), PuzzleResult::Success);
        assert_eq!(messenger.addresses(), vec![SUCCESS]);
    }

    #[tokio::test]
    async fn test_three_wrong_codes_fail() {
        let (mut puzzle, messenger) = enabled().await;

        enter(&mut puzzle, "1234").await;
        enter(&mut puzzle, "1234").await;
        assert_eq!(puzzle.result(), PuzzleResult::Pending);
        enter(&mut puzzle, "1234").await;

        assert_eq!(puzzle.result(), PuzzleResult::Failure);
        assert_eq!(messenger.addresses(), vec![INCORRECT, INCORRECT, FAILURE]);
    }

    #[tokio::test]
    async fn test_keys_after_lockout_are_ignored() {
        let (mut puzzle, messenger) = enabled().await;
        for _ in 0..3 {
            enter(&mut puzzle, "1234").await;
        }
        assert_eq!(puzzle.result(), PuzzleResult::Failure);

        enter(&mut puzzle, "5").await;
        enter(&mut puzzle, "8140").await;
        enter(&mut puzzle, "*").await;

        assert_eq!(puzzle.result(), PuzzleResult::Failure);
        assert_eq!(puzzle.strikes(), 3);
        assert_eq!(puzzle.buffer(), "");
        assert_eq!(messenger.addresses(), vec![INCORRECT, INCORRECT, FAILURE]);
    }

    #[tokio::test]
    async fn test_disabled_ignores_keys() {
        let (mut puzzle, messenger) = setup();

        enter(&mut puzzle, "8140").await;

        assert!(!puzzle.is_enabled());
        assert_eq!(puzzle.buffer(), "");
        assert_eq!(puzzle.result(), PuzzleResult::Pending);
        assert!(messenger.sent().is_empty());
    }

    #[rstest]
    #[case("81*8140", PuzzleResult::Success)]
    #[case("8#140", PuzzleResult::Success)]
    #[case("814*", PuzzleResult::Pending)]
    #[tokio::test]
    async fn test_clear_and_hash(#[case] keys: &str, #[case] expected: PuzzleResult) {
        let (mut puzzle, _messenger) = enabled().await;
        enter(&mut puzzle, keys).await;
        assert_eq!(puzzle.result(), expected);
        assert_eq!(puzzle.strikes(), 0);
    }

    #[tokio::test]
    async fn test_terminal_ignores_keys() {
        let (mut puzzle, messenger) = enabled().await;
        enter(&mut puzzle, "8140").await;
        enter(&mut puzzle, "1234").await;

        assert_eq!(puzzle.strikes(), 0);
        assert_eq!(messenger.addresses(), vec![SUCCESS]);
    }

    #[tokio::test]
    async fn test_reset_clears_failure_and_keeps_gate() {
        let (mut puzzle, messenger) = enabled().await;
        for _ in 0..3 {
            enter(&mut puzzle, "0000").await;
        }
        assert_eq!(puzzle.result(), PuzzleResult::Failure);

        puzzle.handle(PuzzleEvent::Reset).await.unwrap();
        assert_eq!(puzzle.result(), PuzzleResult::Pending);
        assert_eq!(puzzle.strikes(), 0);
        assert!(puzzle.is_enabled());

        enter(&mut puzzle, "8140").await;
        assert_eq!(messenger.count(SUCCESS), 1);
    }

    #[tokio::test]
    async fn test_disabling_drops_partial_entry() {
        let (mut puzzle, _messenger) = enabled().await;
        enter(&mut puzzle, "81").await;

        puzzle.handle(PuzzleEvent::SetEnabled(false)).await.unwrap();
        puzzle.handle(PuzzleEvent::SetEnabled(true)).await.unwrap();
        enter(&mut puzzle, "40").await;

        assert_eq!(puzzle.buffer(), "40");
        assert_eq!(puzzle.result(), PuzzleResult::Pending);
    }
}
