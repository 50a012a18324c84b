//! Shared game-machine trait, lifecycle phases, results and events.
//!
//! Each game implements `GameMachine`:
//! - lifecycle `Phase` and current player
//! - deferred work driven by `advance_time`
//! - semantic `GameEvent`s for presentation and audio
//! - snapshot / restore for the persistence layer

pub mod engine;
pub mod event;

pub use engine::{GameMachine, GameResult, Phase};
pub use event::GameEvent;
