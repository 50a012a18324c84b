//! Memory match game.
//!
//! Fourteen face-down cards hide seven pairs. Opening a card poses its
//! question; a correct answer scores the card's remaining points and flips
//! it, and completing a pair adds a bonus.

mod card;
mod game;

pub use card::{card_rows, Card, MatchPlayer, ROW_PATTERN};
pub use game::{MatchGame, MatchGameBuilder, MatchSnapshot, TurnStage};
