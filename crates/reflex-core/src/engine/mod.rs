//! State machine controller.
//!
//! The controller owns the current [`GameState`] and is the only place that
//! mutates it. Every change goes through [`crate::play::transition`]; the
//! resulting effects are applied quiesce-first, so no event source stays
//! armed while the state it was armed for is being torn down.

mod handlers;

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info, trace, warn};

use crate::board::{Board, Outputs};
use crate::challenge::{ChallengeGenerator, ChallengeMask, SampleSource};
use crate::config::{GameConfig, Timing};
use crate::event::{EventHandle, EventSource};
use crate::play::{Effects, GameState, RoundOutcome, Transition, Trigger, transition};
use crate::score::{BestScoreStore, ScoreKeeper};

pub struct Controller<B, R, S> {
    state: GameState,
    events: EventSource,
    board: B,
    generator: ChallengeGenerator<R>,
    scores: ScoreKeeper<S>,
    timing: Timing,
    challenge: Option<ChallengeMask>,
    last_outcome: Option<RoundOutcome>,
}

impl<B, R, S> Controller<B, R, S>
where
    B: Board,
    R: SampleSource,
    S: BestScoreStore,
{
    /// Create a controller in `Menu`.
    ///
    /// `events` must be the source whose handle feeds `board`'s inputs.
    pub fn new(board: B, events: EventSource, source: R, store: S, config: &GameConfig) -> Self {
        Self {
            state: GameState::Menu,
            events,
            board,
            generator: ChallengeGenerator::new(source),
            scores: ScoreKeeper::new(store),
            timing: config.timing.clone(),
            challenge: None,
            last_outcome: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn session_score(&self) -> u16 {
        self.scores.session()
    }

    pub fn best_score(&self) -> crate::Result<u16> {
        self.scores.best()
    }

    /// Target set of the active round, if any.
    pub fn challenge(&self) -> Option<ChallengeMask> {
        self.challenge
    }

    pub fn last_outcome(&self) -> Option<RoundOutcome> {
        self.last_outcome
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn scores(&self) -> &ScoreKeeper<S> {
        &self.scores
    }

    /// Producer handle for button edges.
    pub fn handle(&self) -> EventHandle {
        self.events.handle()
    }

    /// Run the state machine until `shutdown_requested` is set.
    ///
    /// Every blocking wait checks the flag, so the loop exits within one
    /// poll interval of it being raised (or after a fixed pause finishes).
    pub fn run(&mut self, shutdown_requested: &AtomicBool) {
        info!("Starting game loop...");

        while !shutdown_requested.load(Ordering::SeqCst) {
            self.step(shutdown_requested);
        }

        debug!("Shutdown signal received, exiting game loop");
        self.events.quiesce();
        self.board.set_outputs(Outputs::empty());
        self.board.clear();
    }

    /// Dispatch the handler for the current state once and return the
    /// (possibly new) state.
    pub fn step(&mut self, shutdown_requested: &AtomicBool) -> GameState {
        match self.state {
            GameState::Menu => self.run_menu(shutdown_requested),
            GameState::Countdown => self.run_countdown(),
            GameState::ViewScores => self.run_view_scores(shutdown_requested),
            GameState::Challenge => self.run_challenge(shutdown_requested),
            GameState::RoundResolved => self.run_round_resolved(),
            GameState::Ended => self.run_ended(),
        }
        self.state
    }

    /// Feed a trigger through the transition function.
    ///
    /// Returns `false` (and changes nothing) when the trigger does not apply
    /// to the current state.
    pub fn fire(&mut self, trigger: Trigger) -> bool {
        let Some(next) = transition(self.state, trigger) else {
            trace!("Ignored {:?} in {}", trigger, self.state);
            return false;
        };

        if self.state == GameState::Challenge {
            self.last_outcome = match trigger {
                Trigger::InputMatched => Some(RoundOutcome::Correct),
                Trigger::Button(button) => Some(RoundOutcome::WrongButton(button)),
                Trigger::WindowExpired => Some(RoundOutcome::Expired),
                Trigger::Completed => self.last_outcome,
            };
        }

        self.apply(trigger, next);
        true
    }

    fn apply(&mut self, trigger: Trigger, transition: Transition) {
        let Transition { next, effects } = transition;

        if effects.contains(Effects::QUIESCE) {
            self.events.quiesce();
        }
        if effects.contains(Effects::CLEAR_OUTPUTS) {
            self.board.set_outputs(Outputs::empty());
        }
        if effects.contains(Effects::DISCARD_ROUND) {
            self.challenge = None;
        }
        if effects.contains(Effects::RESET_SCORE) {
            self.scores.reset();
            info!("Session started");
        }
        if effects.contains(Effects::AWARD_POINT) {
            let score = self.scores.award();
            debug!("Correct, score {}", score);
        }
        if effects.contains(Effects::RECORD_BEST) {
            info!(
                "Session ended with score {} ({:?})",
                self.scores.session(),
                self.last_outcome
            );
            // No retry: a failed write loses this best score.
            if let Err(e) = self.scores.record_best() {
                error!(
                    "Failed to persist best score {}: {}",
                    self.scores.session(),
                    e
                );
            }
        }

        debug!(
            "State changed: {} -> {} on {:?} ({:?})",
            self.state, next, trigger, effects
        );
        self.state = next;
    }

    /// Stored best score for rendering; a failed read shows as 0.
    fn best_for_display(&self) -> u16 {
        match self.scores.best() {
            Ok(best) => best,
            Err(e) => {
                warn!("Failed to read best score: {}", e);
                0
            }
        }
    }
}
