//! Wire defusal puzzle.
//!
//! An intact wire holds its line high; a cut wire reads low. Cutting any
//! wire that must stay intact fails the puzzle, even if the right wire is
//! cut as well.

use std::sync::Arc;
use std::time::Duration;

use escaperoom_core::{ChallengeId, PinId};
use escaperoom_hardware::{IndicatorState, InputPort, LedSignal, OutputPort};
use escaperoom_network::Messenger;
use escaperoom_protocol::Address;
use tracing::{debug, info};

use crate::config::{WireConfig, WirePuzzleConfig, WireTimings};
use crate::error::Result;
use crate::puzzle::{Puzzle, notify, show, switch_off};
use crate::result::{PuzzleEvent, PuzzleResult};

/// Wire puzzle state machine (`Pending -> Success | Failure`).
pub struct WireDefusal {
    challenge: ChallengeId,
    wires: Vec<WireConfig>,
    reds: [LedSignal; 2],
    green: LedSignal,
    timings: WireTimings,
    result: PuzzleResult,
    input: Arc<dyn InputPort>,
    messenger: Arc<dyn Messenger>,
}

impl WireDefusal {
    pub fn new(
        config: WirePuzzleConfig,
        input: Arc<dyn InputPort>,
        output: Arc<dyn OutputPort>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        let [red1, red2] = config.red_leds;

        Self {
            challenge: config.challenge,
            wires: config.wires,
            reds: [
                LedSignal::new(red1, Arc::clone(&output)),
                LedSignal::new(red2, Arc::clone(&output)),
            ],
            green: LedSignal::new(config.green_led, output),
            timings: config.timings,
            result: PuzzleResult::Pending,
            input,
            messenger,
        }
    }

    /// Semantic state of the two red LEDs.
    pub fn red_indicators(&self) -> [IndicatorState; 2] {
        [self.reds[0].state(), self.reds[1].state()]
    }

    pub fn green_indicator(&self) -> IndicatorState {
        self.green.state()
    }

    /// Alternating red flash while waiting for a cut.
    async fn show_idle(&mut self) {
        let interval = Duration::from_millis(self.timings.idle_interval_ms);
        let [red1, red2] = &mut self.reds;
        show(red1, IndicatorState::flashing(interval)).await;
        show(
            red2,
            IndicatorState::Flashing {
                interval,
                initial_delay: Duration::from_millis(self.timings.idle_offset_ms),
            },
        )
        .await;
        show(&mut self.green, IndicatorState::Off).await;
    }

    async fn show_failure(&mut self) {
        let fast = Duration::from_millis(self.timings.failure_interval_ms);
        let alt = Duration::from_millis(self.timings.failure_alt_interval_ms);
        let [red1, red2] = &mut self.reds;
        show(red1, IndicatorState::flashing(fast)).await;
        show(red2, IndicatorState::flashing(alt)).await;
        show(&mut self.green, IndicatorState::Off).await;
    }

    async fn show_success(&mut self) {
        for red in &mut self.reds {
            show(red, IndicatorState::Off).await;
        }
        show(&mut self.green, IndicatorState::On).await;
    }

    /// Classify the current cuts: `(any wrong wire cut, any right wire cut)`.
    fn read_cuts(&self) -> Result<(bool, bool)> {
        let mut exploded = false;
        let mut defused = false;
        for wire in &self.wires {
            let cut = !self.input.read(wire.pin)?;
            if cut && wire.needs_cutting {
                defused = true;
            } else if cut {
                exploded = true;
            }
        }
        Ok((exploded, defused))
    }

    async fn evaluate(&mut self) -> Result<()> {
        if self.result.is_terminal() {
            return Ok(());
        }

        let (exploded, defused) = self.read_cuts()?;
        debug!(challenge = %self.challenge, exploded, defused, "Wire evaluation");

        if exploded {
            self.result = PuzzleResult::Failure;
            info!(challenge = %self.challenge, "Wrong wire cut");
            self.show_failure().await;
            notify(self.messenger.as_ref(), Address::Failure(self.challenge));
        } else if defused {
            self.result = PuzzleResult::Success;
            info!(challenge = %self.challenge, "Correct wire cut");
            self.show_success().await;
            notify(self.messenger.as_ref(), Address::Success(self.challenge));
        }
        Ok(())
    }

    async fn reset(&mut self) -> Result<()> {
        info!(challenge = %self.challenge, "Wire puzzle reset");
        self.result = PuzzleResult::Pending;
        self.show_idle().await;
        self.evaluate().await
    }
}

impl Puzzle for WireDefusal {
    fn name(&self) -> &'static str {
        "wire"
    }

    fn challenge(&self) -> ChallengeId {
        self.challenge
    }

    fn result(&self) -> PuzzleResult {
        self.result
    }

    fn input_pins(&self) -> Vec<PinId> {
        self.wires.iter().map(|w| w.pin).collect()
    }

    async fn start(&mut self) -> Result<()> {
        switch_off(&mut self.green).await;
        self.show_idle().await;
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

impl std::fmt::Debug for WireDefusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireDefusal")
            .field("challenge", &self.challenge)
            .field("result", &self.result)
            .finish()
    }
}
