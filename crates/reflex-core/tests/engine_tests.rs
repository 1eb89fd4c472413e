//! End-to-end tests for the game controller.
//!
//! A scripted player reacts to the lights on a `MockBoard`, so every test runs
//! the real handlers, event source and transition function.

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::{Duration, Instant};

use reflex_core::board::mock::{Frame, MockBoard};
use reflex_core::{
    Button, ButtonSet, Color, Controller, EventSource, GameConfig, GameState, MemoryStore,
    Outputs, Region, RoundOutcome, SequenceSource, Timing,
};

type TestController = Controller<MockBoard, SequenceSource, MemoryStore>;

fn fast_config(window_ms: u64) -> GameConfig {
    GameConfig {
        timing: Timing {
            response_window_ms: window_ms,
            countdown_step_ms: 0,
            round_pause_ms: 0,
            game_over_hold_ms: 0,
            result_hold_ms: 0,
            chime_interval_ms: 0,
            poll_interval_ms: 1,
            attract_interval_ms: 5,
            ..Timing::default()
        },
    }
}

/// What the scripted player does.
#[derive(Debug, Clone, Default)]
struct Plan {
    /// Buttons tapped when the menu lights up, one per visit.
    menu: Vec<Button>,
    /// Tap Exit when the scoreboard lights up.
    exit_scores: bool,
    /// Number of rounds answered by holding exactly the lit colors.
    correct_rounds: usize,
    /// After the correct rounds: buttons held instead of the answer.
    /// `None` means no input at all.
    then_hold: Option<ButtonSet>,
    /// After the correct rounds: hold only the first lit color.
    then_hold_first_only: bool,
}

fn controller(
    plan: Plan,
    source: SequenceSource,
    store: MemoryStore,
    window_ms: u64,
) -> TestController {
    controller_with(plan, source, store, fast_config(window_ms))
}

fn controller_with(
    plan: Plan,
    source: SequenceSource,
    store: MemoryStore,
    config: GameConfig,
) -> TestController {
    let events = EventSource::new();
    let mut menu: VecDeque<Button> = plan.menu.into_iter().collect();
    let mut answered = 0;

    let board = MockBoard::new(events.handle()).on_outputs(move |outputs, hands| {
        if outputs.is_empty() {
            hands.release_all();
            return;
        }
        if outputs == Outputs::START | Outputs::RED {
            if let Some(button) = menu.pop_front() {
                hands.tap(button);
            }
            return;
        }
        if outputs == Outputs::START {
            if plan.exit_scores {
                hands.tap(Button::EXIT);
            }
            return;
        }

        let mask = outputs.color_lights();
        if mask.is_empty() {
            return;
        }
        if answered < plan.correct_rounds {
            answered += 1;
            hands.hold(ButtonSet::from(mask));
        } else if plan.then_hold_first_only {
            if let Some(first) = mask.colors().next() {
                hands.hold(ButtonSet::from(Button::from(first)));
            }
        } else if let Some(held) = plan.then_hold {
            hands.hold(held);
        }
    });

    Controller::new(board, events, source, store, &config)
}

/// Step until `target` is reached; panics after `limit` steps.
fn step_until(ctrl: &mut TestController, target: GameState, limit: usize) {
    let shutdown = AtomicBool::new(false);
    for _ in 0..limit {
        if ctrl.step(&shutdown) == target {
            return;
        }
    }
    panic!("did not reach {} within {} steps, in {}", target, limit, ctrl.state());
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_scenario_a_correct_answer_scores() {
        let plan = Plan {
            menu: vec![Button::Start],
            correct_rounds: 1,
            ..Plan::default()
        };
        let source = SequenceSource::from_colors(&[Color::Red]);
        let mut ctrl = controller(plan, source, MemoryStore::new(), 2000);
        let shutdown = AtomicBool::new(false);

        assert_eq!(ctrl.step(&shutdown), GameState::Countdown);
        assert_eq!(ctrl.step(&shutdown), GameState::Challenge);
        assert_eq!(ctrl.session_score(), 0);

        assert_eq!(ctrl.step(&shutdown), GameState::RoundResolved);
        assert_eq!(ctrl.session_score(), 1);
        assert_eq!(ctrl.last_outcome(), Some(RoundOutcome::Correct));
        assert_eq!(ctrl.challenge(), None);

        assert_eq!(ctrl.step(&shutdown), GameState::Challenge);
        assert_eq!(ctrl.session_score(), 1);
    }

    #[test]
    fn test_scenario_b_wrong_button_ends_immediately() {
        let plan = Plan {
            menu: vec![Button::Start],
            then_hold: Some(ButtonSet::RED),
            ..Plan::default()
        };
        let source = SequenceSource::from_colors(&[Color::Blue]);
        let mut ctrl = controller(plan, source, MemoryStore::new(), 5000);
        let shutdown = AtomicBool::new(false);

        ctrl.step(&shutdown);
        ctrl.step(&shutdown);
        assert_eq!(ctrl.state(), GameState::Challenge);

        let start = Instant::now();
        assert_eq!(ctrl.step(&shutdown), GameState::Ended);
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(ctrl.session_score(), 0);
        assert_eq!(
            ctrl.last_outcome(),
            Some(RoundOutcome::WrongButton(Button::Red))
        );
    }

    #[test]
    fn test_scenario_c_expiry_records_best() {
        let plan = Plan {
            menu: vec![Button::Start],
            correct_rounds: 7,
            ..Plan::default()
        };
        let source = SequenceSource::from_colors(&[Color::Green, Color::Yellow]);
        let mut ctrl = controller(plan, source, MemoryStore::with_best(5), 30);

        step_until(&mut ctrl, GameState::Ended, 40);
        assert_eq!(ctrl.session_score(), 7);
        assert_eq!(ctrl.last_outcome(), Some(RoundOutcome::Expired));
        assert_eq!(ctrl.best_score().unwrap(), 7);
        assert_eq!(ctrl.scores().store().writes(), 1);

        step_until(&mut ctrl, GameState::Menu, 1);
        let texts = ctrl.board().texts();
        assert!(texts.contains(&"Game Over."));
        assert!(texts.contains(&"Score: 7"));
        assert!(texts.contains(&"High Score: 7"));
    }

    #[test]
    fn test_scenario_d_view_scores_is_read_only() {
        let plan = Plan {
            menu: vec![Button::SCORES],
            exit_scores: true,
            ..Plan::default()
        };
        let source = SequenceSource::new(vec![0]);
        let mut ctrl = controller(plan, source, MemoryStore::with_best(5), 2000);
        let shutdown = AtomicBool::new(false);

        assert_eq!(ctrl.step(&shutdown), GameState::ViewScores);
        assert_eq!(ctrl.step(&shutdown), GameState::Menu);

        let frames = ctrl.board().frames();
        assert!(frames.contains(&Frame::Text(Region::Top, "Session: 0     ".to_string())));
        assert!(frames.contains(&Frame::Text(
            Region::Bottom,
            "HighScore: 5    ".to_string()
        )));
        assert_eq!(ctrl.session_score(), 0);
        assert_eq!(ctrl.best_score().unwrap(), 5);
        assert_eq!(ctrl.scores().store().writes(), 0);
    }
}

mod round_tests {
    use super::*;

    /// Eleven single-color rounds, then a Blue+Green round at tier 2.
    fn tier_two_source() -> SequenceSource {
        let mut samples = vec![Color::Red as u8; 11];
        samples.push(Color::Blue as u8);
        samples.push(Color::Green as u8);
        SequenceSource::new(samples)
    }

    #[test]
    fn test_answer_held_at_lights_on_beats_long_poll() {
        let plan = Plan {
            menu: vec![Button::Start],
            correct_rounds: 1,
            ..Plan::default()
        };
        let mut config = fast_config(50);
        config.timing.poll_interval_ms = 100;
        let source = SequenceSource::from_colors(&[Color::Red]);
        let mut ctrl = controller_with(plan, source, MemoryStore::new(), config);

        step_until(&mut ctrl, GameState::Challenge, 3);
        assert_eq!(ctrl.step(&AtomicBool::new(false)), GameState::RoundResolved);
        assert_eq!(ctrl.last_outcome(), Some(RoundOutcome::Correct));
        assert_eq!(ctrl.session_score(), 1);
    }

    #[test]
    fn test_answer_held_mid_window_is_sampled() {
        let plan = Plan {
            menu: vec![Button::Start],
            ..Plan::default()
        };
        let mut config = fast_config(300);
        config.timing.poll_interval_ms = 5000;
        let source = SequenceSource::from_colors(&[Color::Yellow]);
        let mut ctrl = controller_with(plan, source, MemoryStore::new(), config);
        step_until(&mut ctrl, GameState::Challenge, 3);

        let hands = ctrl.board().hands().clone();
        let input = thread::spawn(move || {
            thread::sleep(Duration::from_millis(40));
            hands.hold(ButtonSet::YELLOW);
        });

        let start = Instant::now();
        step_until(&mut ctrl, GameState::RoundResolved, 1);
        input.join().unwrap();

        assert!(start.elapsed() < Duration::from_millis(300));
        assert_eq!(ctrl.last_outcome(), Some(RoundOutcome::Correct));
    }

    #[test]
    fn test_subset_answer_times_out() {
        let plan = Plan {
            menu: vec![Button::Start],
            correct_rounds: 11,
            then_hold_first_only: true,
            ..Plan::default()
        };
        let mut ctrl = controller(plan, tier_two_source(), MemoryStore::new(), 40);

        step_until(&mut ctrl, GameState::Ended, 60);
        assert_eq!(ctrl.session_score(), 11);
        assert_eq!(ctrl.last_outcome(), Some(RoundOutcome::Expired));
    }

    #[test]
    fn test_superset_answer_fails_on_extra_button() {
        let plan = Plan {
            menu: vec![Button::Start],
            correct_rounds: 11,
            then_hold: Some(ButtonSet::BLUE | ButtonSet::GREEN | ButtonSet::YELLOW),
            ..Plan::default()
        };
        let mut ctrl = controller(plan, tier_two_source(), MemoryStore::new(), 5000);

        step_until(&mut ctrl, GameState::Ended, 60);
        assert_eq!(ctrl.session_score(), 11);
        assert_eq!(
            ctrl.last_outcome(),
            Some(RoundOutcome::WrongButton(Button::Yellow))
        );
    }

    #[test]
    fn test_exact_multi_color_answer() {
        let plan = Plan {
            menu: vec![Button::Start],
            correct_rounds: 12,
            ..Plan::default()
        };
        let mut ctrl = controller(plan, tier_two_source(), MemoryStore::new(), 40);

        step_until(&mut ctrl, GameState::Ended, 80);
        assert_eq!(ctrl.session_score(), 12);
    }

    #[test]
    fn test_score_resets_at_countdown_entry() {
        let plan = Plan {
            menu: vec![Button::Start, Button::Start],
            correct_rounds: 3,
            ..Plan::default()
        };
        let source = SequenceSource::from_colors(&[Color::Yellow]);
        let mut ctrl = controller(plan, source, MemoryStore::new(), 30);

        step_until(&mut ctrl, GameState::Menu, 20);
        assert_eq!(ctrl.session_score(), 3);

        // Next session starts from zero.
        let shutdown = AtomicBool::new(false);
        assert_eq!(ctrl.step(&shutdown), GameState::Countdown);
        assert_eq!(ctrl.session_score(), 0);
    }

    #[test]
    fn test_score_is_monotonic_within_session() {
        let plan = Plan {
            menu: vec![Button::Start],
            correct_rounds: 5,
            ..Plan::default()
        };
        let source = SequenceSource::from_colors(&[Color::Red, Color::Blue]);
        let mut ctrl = controller(plan, source, MemoryStore::new(), 30);

        step_until(&mut ctrl, GameState::Ended, 30);
        let drawn = ctrl.board().scores();
        assert!(drawn.windows(2).all(|w| w[0] <= w[1]), "{:?}", drawn);
        assert_eq!(drawn.last(), Some(&5));
    }

    #[test]
    fn test_chime_after_correct_answer() {
        let plan = Plan {
            menu: vec![Button::Start],
            correct_rounds: 1,
            ..Plan::default()
        };
        let source = SequenceSource::from_colors(&[Color::Green]);
        let mut ctrl = controller(plan, source, MemoryStore::new(), 2000);

        step_until(&mut ctrl, GameState::RoundResolved, 5);
        step_until(&mut ctrl, GameState::Challenge, 1);
        assert!(ctrl.board().frames().contains(&Frame::Pulse {
            outputs: Outputs::BUZZER,
            cycles: 20,
        }));
    }

    #[test]
    fn test_countdown_sequence() {
        let plan = Plan {
            menu: vec![Button::Start],
            ..Plan::default()
        };
        let mut ctrl = controller(plan, SequenceSource::new(vec![0]), MemoryStore::new(), 2000);

        step_until(&mut ctrl, GameState::Challenge, 3);
        let texts = ctrl.board().texts();
        let countdown: Vec<&str> = texts
            .iter()
            .copied()
            .skip_while(|t| *t != "Starting...")
            .collect();
        assert_eq!(countdown, vec!["Starting...", "3", "2", "1", "Score: "]);
        assert_eq!(ctrl.board().scores(), vec![0]);
    }
}

mod persistence_tests {
    use super::*;

    #[test]
    fn test_no_write_when_not_greater() {
        let plan = Plan {
            menu: vec![Button::Start],
            correct_rounds: 2,
            ..Plan::default()
        };
        let source = SequenceSource::from_colors(&[Color::Blue]);
        let mut ctrl = controller(plan, source, MemoryStore::with_best(10), 30);

        step_until(&mut ctrl, GameState::Menu, 20);
        assert_eq!(ctrl.best_score().unwrap(), 10);
        assert_eq!(ctrl.scores().store().writes(), 0);
        assert!(ctrl.board().texts().contains(&"High Score: 10"));
    }

    #[test]
    fn test_equal_score_is_not_written() {
        let plan = Plan {
            menu: vec![Button::Start],
            correct_rounds: 4,
            ..Plan::default()
        };
        let source = SequenceSource::from_colors(&[Color::Red]);
        let mut ctrl = controller(plan, source, MemoryStore::with_best(4), 30);

        step_until(&mut ctrl, GameState::Menu, 20);
        assert_eq!(ctrl.scores().store().writes(), 0);
    }

    #[test]
    fn test_failed_write_does_not_block_game() {
        let plan = Plan {
            menu: vec![Button::Start],
            correct_rounds: 2,
            ..Plan::default()
        };
        let source = SequenceSource::from_colors(&[Color::Red]);
        let mut ctrl = controller(plan, source, MemoryStore::new().failing(), 30);

        step_until(&mut ctrl, GameState::Menu, 20);
        assert_eq!(ctrl.best_score().unwrap(), 0);
        assert_eq!(ctrl.session_score(), 2);
    }

    #[test]
    fn test_view_scores_after_session() {
        let plan = Plan {
            menu: vec![Button::Start, Button::SCORES],
            correct_rounds: 3,
            exit_scores: true,
            ..Plan::default()
        };
        let source = SequenceSource::from_colors(&[Color::Yellow]);
        let mut ctrl = controller(plan, source, MemoryStore::new(), 30);

        step_until(&mut ctrl, GameState::Menu, 20);
        ctrl.board_mut().clear_frames();

        step_until(&mut ctrl, GameState::ViewScores, 1);
        step_until(&mut ctrl, GameState::Menu, 1);
        let texts = ctrl.board().texts();
        assert!(texts.contains(&"Session: 3     "));
        assert!(texts.contains(&"HighScore: 3    "));
    }
}

mod concurrency_tests {
    use super::*;

    #[test]
    fn test_edge_from_input_thread_preempts_round() {
        let plan = Plan {
            menu: vec![Button::Start],
            ..Plan::default()
        };
        let source = SequenceSource::from_colors(&[Color::Green]);
        let mut ctrl = controller(plan, source, MemoryStore::new(), 5000);
        step_until(&mut ctrl, GameState::Challenge, 3);

        let hands = ctrl.board().hands().clone();
        let input = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            hands.hold(ButtonSet::BLUE);
        });

        let start = Instant::now();
        step_until(&mut ctrl, GameState::Ended, 1);
        input.join().unwrap();

        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(
            ctrl.last_outcome(),
            Some(RoundOutcome::WrongButton(Button::Blue))
        );
    }

    #[test]
    fn test_target_edges_are_not_failures() {
        let plan = Plan {
            menu: vec![Button::Start],
            ..Plan::default()
        };
        let source = SequenceSource::from_colors(&[Color::Red]);
        let mut ctrl = controller(plan, source, MemoryStore::new(), 80);
        step_until(&mut ctrl, GameState::Challenge, 3);

        // Target and Start are not armed during the round.
        let hands = ctrl.board().hands().clone();
        let input = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            (hands.tap(Button::Red), hands.tap(Button::Start))
        });

        step_until(&mut ctrl, GameState::Ended, 1);
        assert_eq!(input.join().unwrap(), (false, false));
        assert_eq!(ctrl.last_outcome(), Some(RoundOutcome::Expired));
    }

    #[test]
    fn test_edges_before_session_are_discarded() {
        let plan = Plan {
            menu: vec![Button::Start],
            correct_rounds: 1,
            ..Plan::default()
        };
        let source = SequenceSource::from_colors(&[Color::Red]);
        let mut ctrl = controller(plan, source, MemoryStore::new(), 2000);

        // Nothing is armed yet: these never reach the controller.
        assert!(!ctrl.board().hands().tap(Button::Blue));
        assert!(!ctrl.board().hands().tap(Button::Green));

        step_until(&mut ctrl, GameState::RoundResolved, 5);
        assert_eq!(ctrl.session_score(), 1);
    }

    #[test]
    fn test_shutdown_leaves_menu_untouched() {
        let plan = Plan::default();
        let source = SequenceSource::new(vec![0]);
        let mut ctrl = controller(plan, source, MemoryStore::new(), 2000);
        let shutdown = AtomicBool::new(true);

        assert_eq!(ctrl.step(&shutdown), GameState::Menu);
        ctrl.run(&shutdown);
        assert_eq!(ctrl.state(), GameState::Menu);
        assert_eq!(ctrl.board().frames().last(), Some(&Frame::Clear));
    }
}
