//! Shuffling and lap-based drawing shared by both games.
//!
//! - `shuffle`: in-place uniform Fisher–Yates
//! - `Deck`: deal without replacement from a shuffled copy, reshuffling a
//!   fresh copy of the full source when a lap is exhausted

mod pile;
mod shuffle;

pub use pile::Deck;
pub use shuffle::{shuffle, shuffled};
