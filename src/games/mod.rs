//! The two quiz-gated games.
//!
//! - `matching`: two-team memory match with free-answer questions
//! - `board`: three-team snakes & ladders with multiple-choice challenges

pub mod board;
pub mod matching;

pub use board::{BoardGame, BoardGameBuilder};
pub use matching::{MatchGame, MatchGameBuilder};
