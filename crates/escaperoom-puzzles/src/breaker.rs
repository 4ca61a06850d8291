//! Breaker panel puzzle.
//!
//! Each breaker that is on scores `+1` when it is supposed to be on and `-1`
//! otherwise. The three progress LEDs show the score in steps of two:
//!
//! ```text
//! counter   LED0   LED1   LED2
//!   <=0     off    off    off
//!    1      flash  off    off
//!    2      on     off    off
//!    3      on     flash  off
//!    5      on     on     flash
//!    6      on     on     on     -> success
//! ```
//!
//! The counter is recomputed from every line on each evaluation, so
//! duplicate or bounced edges are harmless.

use std::sync::Arc;
use std::time::Duration;

use escaperoom_core::{ChallengeId, PinId};
use escaperoom_hardware::{IndicatorState, InputPort, LedSignal, OutputPort};
use escaperoom_network::Messenger;
use escaperoom_protocol::Address;
use tracing::{debug, info};

use crate::config::{BreakerConfig, BreakerPuzzleConfig};
use crate::error::Result;
use crate::puzzle::{Puzzle, notify, show, switch_off};
use crate::result::{PuzzleEvent, PuzzleResult};

/// Indicator state of progress LED `index` for a given counter.
pub fn progress_indicator(index: usize, counter: i32, flash_interval: Duration) -> IndicatorState {
    let threshold = 2 * index as i64 + 1;
    let counter = i64::from(counter);

    if threshold < counter {
        IndicatorState::On
    } else if threshold == counter {
        IndicatorState::flashing(flash_interval)
    } else {
        IndicatorState::Off
    }
}

/// Breaker panel state machine (`Pending -> Success`).
pub struct BreakerMatch {
    challenge: ChallengeId,
    breakers: Vec<BreakerConfig>,
    leds: Vec<LedSignal>,
    flash_interval: Duration,
    target: i32,
    counter: i32,
    result: PuzzleResult,
    input: Arc<dyn InputPort>,
    messenger: Arc<dyn Messenger>,
}

impl BreakerMatch {
    pub fn new(
        config: BreakerPuzzleConfig,
        input: Arc<dyn InputPort>,
        output: Arc<dyn OutputPort>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        let leds = config
            .leds
            .iter()
            .map(|&pin| LedSignal::new(pin, Arc::clone(&output)))
            .collect();

        Self {
            challenge: config.challenge,
            target: config.success_target(),
            flash_interval: config.flash_interval(),
            breakers: config.breakers,
            leds,
            counter: 0,
            result: PuzzleResult::Pending,
            input,
            messenger,
        }
    }

    /// Score from the last evaluation.
    pub fn counter(&self) -> i32 {
        self.counter
    }

    /// Semantic state of each progress LED.
    pub fn indicators(&self) -> Vec<IndicatorState> {
        self.leds.iter().map(LedSignal::state).collect()
    }

    fn compute_counter(&self) -> Result<i32> {
        let mut counter = 0;
        for breaker in &self.breakers {
            if self.input.read(breaker.pin)? {
                counter += if breaker.expected_on { 1 } else { -1 };
            }
        }
        Ok(counter)
    }

    async fn evaluate(&mut self) -> Result<()> {
        if self.result == PuzzleResult::Success {
            return Ok(());
        }

        self.counter = self.compute_counter()?;
        debug!(challenge = %self.challenge, counter = self.counter, target = self.target, "Breaker evaluation");

        for (index, led) in self.leds.iter_mut().enumerate() {
            show(led, progress_indicator(index, self.counter, self.flash_interval)).await;
        }

        if self.counter == self.target {
            self.result = PuzzleResult::Success;
            info!(challenge = %self.challenge, "Breaker panel solved");
            notify(self.messenger.as_ref(), Address::Success(self.challenge));
        }
        Ok(())
    }

    async fn clear_leds(&mut self) {
        for led in &mut self.leds {
            switch_off(led).await;
        }
    }

    async fn reset(&mut self) -> Result<()> {
        info!(challenge = %self.challenge, "Breaker panel reset");
        self.result = PuzzleResult::Pending;
        self.counter = 0;
        self.clear_leds().await;
        self.evaluate().await
    }
}

impl Puzzle for BreakerMatch {
    fn name(&self) -> &'static str {
        "breaker"
    }

    fn challenge(&self) -> ChallengeId {
        self.challenge
    }

    fn result(&self) -> PuzzleResult {
        self.result
    }

    fn input_pins(&self) -> Vec<PinId> {
        self.breakers.iter().map(|b| b.pin).collect()
    }

    async fn start(&mut self) -> Result<()> {
        self.clear_leds().await;
        self.evaluate().await
    }

    async fn handle(&mut self, event: PuzzleEvent) -> Result<()> {
        match event {
            PuzzleEvent::InputChanged(_) => self.evaluate().await,
            PuzzleEvent::Reset => self.reset().await,
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for BreakerMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreakerMatch")
            .field("challenge", &self.challenge)
            .field("counter", &self.counter)
            .field("target", &self.target)
            .field("result", &self.result)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escaperoom_hardware::MockBoard;
    use escaperoom_network::MockMessenger;
    use proptest::prelude::*;
    use rstest::rstest;

    const SUCCESS: &str = "/escaperoom/challenge/1/success";

    fn setup() -> (BreakerMatch, MockBoard, MockMessenger, BreakerPuzzleConfig) {
        let config = BreakerPuzzleConfig::default();
        let board = MockBoard::new();
        let messenger = MockMessenger::new();
        let puzzle = BreakerMatch::new(
            config.clone(),
            Arc::new(board.clone()),
            Arc::new(board.clone()),
            Arc::new(messenger.clone()),
        );
        (puzzle, board, messenger, config)
    }

    /// Turn on the first `n` breakers that are expected on.
    fn turn_on_correct(board: &MockBoard, config: &BreakerPuzzleConfig, n: usize) {
        for breaker in config.breakers.iter().filter(|b| b.expected_on).take(n) {
            board.preset_input(breaker.pin, true);
        }
    }

    fn flashing() -> IndicatorState {
        IndicatorState::flashing(Duration::from_millis(200))
    }

    #[rstest]
    #[case(0, [IndicatorState::Off, IndicatorState::Off, IndicatorState::Off])]
    #[case(1, [flashing(), IndicatorState::Off, IndicatorState::Off])]
    #[case(2, [IndicatorState::On, IndicatorState::Off, IndicatorState::Off])]
    #[case(3, [IndicatorState::On, flashing(), IndicatorState::Off])]
    #[case(5, [IndicatorState::On, IndicatorState::On, flashing()])]
    #[case(6, [IndicatorState::On, IndicatorState::On, IndicatorState::On])]
    #[case(-2, [IndicatorState::Off, IndicatorState::Off, IndicatorState::Off])]
    fn test_progress_indicator(#[case] counter: i32, #[case] expected: [IndicatorState; 3]) {
        let actual: Vec<_> = (0..3)
            .map(|i| progress_indicator(i, counter, Duration::from_millis(200)))
            .collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_correct_breakers_solve_once() {
        let (mut puzzle, board, messenger, config) = setup();
        turn_on_correct(&board, &config, 6);

        puzzle.handle(PuzzleEvent::InputChanged(PinId::bcm(4))).await.unwrap();
        puzzle.handle(PuzzleEvent::InputChanged(PinId::bcm(4))).await.unwrap();

        assert_eq!(puzzle.counter(), 6);
        assert_eq!(puzzle.result(), PuzzleResult::Success);
        assert_eq!(messenger.count(SUCCESS), 1);
        assert_eq!(puzzle.indicators(), vec![IndicatorState::On; 3]);
        for pin in [19, 16, 26] {
            assert_eq!(board.output(PinId::bcm(pin)), Some(true));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_progress_flashes_middle_led() {
        let (mut puzzle, board, messenger, config) = setup();
        turn_on_correct(&board, &config, 3);

        puzzle.start().await.unwrap();

        assert_eq!(puzzle.counter(), 3);
        assert_eq!(puzzle.result(), PuzzleResult::Pending);
        assert_eq!(
            puzzle.indicators(),
            vec![IndicatorState::On, flashing(), IndicatorState::Off]
        );
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_breaker_subtracts() {
        let (mut puzzle, board, _messenger, config) = setup();
        turn_on_correct(&board, &config, 6);
        // GPIO14 is expected off.
        board.preset_input(PinId::bcm(14), true);

        puzzle.start().await.unwrap();

        assert_eq!(puzzle.counter(), 5);
        assert_eq!(puzzle.result(), PuzzleResult::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_is_sticky_until_reset() {
        let (mut puzzle, board, messenger, config) = setup();
        turn_on_correct(&board, &config, 6);
        puzzle.start().await.unwrap();
        assert_eq!(puzzle.result(), PuzzleResult::Success);

        // Changes after success are ignored.
        board.preset_input(PinId::bcm(4), false);
        puzzle.handle(PuzzleEvent::InputChanged(PinId::bcm(4))).await.unwrap();
        assert_eq!(puzzle.counter(), 6);
        assert_eq!(puzzle.result(), PuzzleResult::Success);

        puzzle.handle(PuzzleEvent::Reset).await.unwrap();
        assert_eq!(puzzle.result(), PuzzleResult::Pending);
        assert_eq!(puzzle.counter(), 5);
        assert_eq!(
            puzzle.indicators(),
            vec![IndicatorState::On, IndicatorState::On, flashing()]
        );

        board.preset_input(PinId::bcm(4), true);
        puzzle.handle(PuzzleEvent::InputChanged(PinId::bcm(4))).await.unwrap();
        assert_eq!(messenger.count(SUCCESS), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_with_solved_board_resolves_immediately() {
        let (mut puzzle, board, messenger, config) = setup();
        turn_on_correct(&board, &config, 6);
        puzzle.start().await.unwrap();

        puzzle.handle(PuzzleEvent::Reset).await.unwrap();

        assert_eq!(puzzle.result(), PuzzleResult::Success);
        assert_eq!(messenger.count(SUCCESS), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_broken_led_does_not_block_success() {
        let (mut puzzle, board, messenger, config) = setup();
        board.fail_writes(PinId::bcm(26));
        puzzle.start().await.unwrap();

        turn_on_correct(&board, &config, 6);
        for _ in 0..3 {
            puzzle.handle(PuzzleEvent::InputChanged(PinId::bcm(4))).await.unwrap();
        }

        assert_eq!(puzzle.counter(), 6);
        assert_eq!(puzzle.result(), PuzzleResult::Success);
        assert_eq!(messenger.addresses(), vec![SUCCESS]);
        assert_eq!(board.output(PinId::bcm(19)), Some(true));
        assert_eq!(board.output(PinId::bcm(16)), Some(true));
        assert_eq!(board.output(PinId::bcm(26)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_key_events_are_ignored() {
        let (mut puzzle, _board, messenger, _config) = setup();
        puzzle
            .handle(PuzzleEvent::Key(escaperoom_hardware::KeypadInput::Digit(1)))
            .await
            .unwrap();
        assert_eq!(puzzle.counter(), 0);
        assert!(messenger.sent().is_empty());
    }

    proptest! {
        /// Property: the counter equals correct-on minus wrong-on, and success
        /// happens exactly when every expected breaker is on and no other is.
        #[test]
        fn prop_counter_matches_board(states in prop::collection::vec(any::<bool>(), 12)) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .start_paused(true)
                .build()
                .unwrap();

            runtime.block_on(async {
                let (mut puzzle, board, messenger, config) = setup();
                for (breaker, &on) in config.breakers.iter().zip(&states) {
                    board.preset_input(breaker.pin, on);
                }

                puzzle.start().await.unwrap();

                let expected: i32 = config
                    .breakers
                    .iter()
                    .zip(&states)
                    .filter(|(_, on)| **on)
                    .map(|(b, _)| if b.expected_on { 1 } else { -1 })
                    .sum();
                prop_assert_eq!(puzzle.counter(), expected);

                let solved = config
                    .breakers
                    .iter()
                    .zip(&states)
                    .all(|(b, &on)| b.expected_on == on);
                prop_assert_eq!(puzzle.result() == PuzzleResult::Success, solved);
                prop_assert_eq!(messenger.count(SUCCESS), usize::from(solved));
                Ok(())
            })?;
        }
    }
}
