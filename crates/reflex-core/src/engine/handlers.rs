//! Per-state handlers.
//!
//! Each handler performs the entry action of its state, then either returns
//! after firing `Completed` or waits (preemptibly) until an event moves the
//! state away.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::Controller;
use crate::board::{Board, Outputs, Region};
use crate::challenge::{ButtonSet, SampleSource};
use crate::config::timing;
use crate::play::{Button, DifficultyTier, Trigger};
use crate::score::BestScoreStore;

const COUNTDOWN_TEXT: [&str; timing::COUNTDOWN_STEPS] = ["Starting...", "3", "2", "1"];

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

impl<B, R, S> Controller<B, R, S>
where
    B: Board,
    R: SampleSource,
    S: BestScoreStore,
{
    pub(super) fn run_menu(&mut self, shutdown_requested: &AtomicBool) {
        let lit = Outputs::START | Outputs::RED;

        self.events
            .arm(ButtonSet::from(Button::Start) | ButtonSet::from(Button::SCORES));
        self.board.clear();
        self.board.write(Region::Top, "White: Start");
        self.board.write(Region::Bottom, "Red: Scoreboard");
        self.board.set_outputs(lit);

        // Attract blink while idle
        let mut on = true;
        while !shutdown_requested.load(Ordering::SeqCst) {
            match self.events.next(self.timing.attract_interval()) {
                Some(event) => {
                    if self.fire(event.into()) {
                        return;
                    }
                }
                None => {
                    on = !on;
                    self.board
                        .set_outputs(if on { lit } else { Outputs::empty() });
                }
            }
        }
    }

    pub(super) fn run_countdown(&mut self) {
        let step = self.timing.countdown_step();
        for text in COUNTDOWN_TEXT {
            self.board.clear();
            self.board.write(Region::Top, text);
            pause(step);
        }

        self.board.clear();
        self.board.write(Region::Top, "Score: ");
        self.board.draw_score(self.scores.session());
        self.fire(Trigger::Completed);
    }

    pub(super) fn run_challenge(&mut self, shutdown_requested: &AtomicBool) {
        let score = self.scores.session();
        let tier = DifficultyTier::for_score(score);
        let mask = self.generator.generate(tier);
        self.challenge = Some(mask);
        debug!("Round at score {} ({}): {}", score, tier, mask);

        self.board.draw_score(score);

        // Arm before lighting up so no reaction can precede the window.
        self.events.arm(ButtonSet::from(mask.complement()));
        self.events.arm_window(self.timing.response_window());
        self.board.set_outputs(Outputs::lights(mask));

        let poll = self.timing.poll_interval();
        while !shutdown_requested.load(Ordering::SeqCst) {
            // Edges that arrived since the last pass win over the comparison.
            if let Some(button) = self.events.next_edge(Duration::ZERO) {
                if self.fire(Trigger::Button(button)) {
                    return;
                }
                continue;
            }

            // Sample first: a match counts only if the window was still open
            // after the sample was taken.
            let held = self.board.snapshot().colors();
            if self.events.take_expired() {
                self.fire(Trigger::WindowExpired);
                return;
            }
            if held == mask {
                self.fire(Trigger::InputMatched);
                return;
            }

            let wait = self
                .events
                .window_remaining()
                .map_or(poll, |left| left.min(poll));
            if let Some(button) = self.events.next_edge(wait)
                && self.fire(Trigger::Button(button))
            {
                return;
            }
        }
    }

    pub(super) fn run_round_resolved(&mut self) {
        self.board.draw_score(self.scores.session());
        self.board.pulse(
            Outputs::BUZZER,
            self.timing.chime_cycles,
            self.timing.chime_interval(),
        );
        pause(self.timing.round_pause());
        self.fire(Trigger::Completed);
    }

    pub(super) fn run_ended(&mut self) {
        let session = self.scores.session();
        let best = self.best_for_display();

        self.board.clear();
        self.board.write(Region::Top, "Game Over.");
        pause(self.timing.game_over_hold());

        self.board.clear();
        self.board.write(Region::Top, &format!("Score: {}", session));
        self.board
            .write(Region::Bottom, &format!("High Score: {}", best));
        pause(self.timing.result_hold());

        self.fire(Trigger::Completed);
    }

    pub(super) fn run_view_scores(&mut self, shutdown_requested: &AtomicBool) {
        self.events.arm(ButtonSet::from(Button::EXIT));

        let best = self.best_for_display();
        self.board.clear();
        self.board.write(
            Region::Top,
            &format!("Session: {:<6}", self.scores.session()),
        );
        self.board
            .write(Region::Bottom, &format!("HighScore: {:<5}", best));
        self.board.set_outputs(Outputs::START);

        while !shutdown_requested.load(Ordering::SeqCst) {
            if let Some(event) = self.events.next(self.timing.attract_interval())
                && self.fire(event.into())
            {
                return;
            }
        }
    }
}
