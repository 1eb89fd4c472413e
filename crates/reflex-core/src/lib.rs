//! # reflex-core
//!
//! Core library for the reflex memory game.
//!
//! This crate provides:
//! - The game state machine and its single transition function
//! - Armed/disarmed asynchronous event sources (button edges, response window)
//! - Difficulty-scaled challenge generation behind a seedable sample source
//! - Session score and durable best score with update-if-greater semantics
//! - Board traits (display, lights, buzzer, buttons) and a scripted mock board

pub mod board;
pub mod challenge;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod play;
pub mod score;

// Re-export from board module
pub use board::{Board, FeedbackSink, InputPort, Outputs, Region};

// Re-export from challenge module
pub use challenge::{
    ButtonSet, ChallengeGenerator, ChallengeMask, CounterSeeded, SampleSource, SeededSource,
    SequenceSource,
};

// Re-export from config module
pub use config::{GameConfig, Timing};

// Re-export from engine module
pub use engine::Controller;

// Re-export from error module
pub use error::{Error, Result};

// Re-export from event module
pub use event::{Event, EventHandle, EventSource};

// Re-export from play module
pub use play::{
    Button, Color, DifficultyTier, Effects, GameState, RoundOutcome, Transition, Trigger,
    transition,
};

// Re-export from score module
pub use score::{BestScoreRecord, BestScoreStore, FileStore, MemoryStore, ScoreKeeper};
