//! Shared surface of the two turn-based games.
//!
//! Both machines implement `GameMachine` so hosts and the persistence layer
//! can drive them the same way:
//! - forward time with `advance_time`
//! - drain semantic events after each input
//! - snapshot on every committed transition (`revision` changes)
//! - restore from a snapshot at startup

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use crate::core::{PlayerId, RestoreError};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Scores and tie-breakers were level.
    Tie,
    /// Finishing order, first place first.
    Ranking(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won (or placed first).
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Ranking(order) => order.first() == Some(&player),
            GameResult::Tie => false,
        }
    }
}

/// Top-level lifecycle shared by both games.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for team names.
    #[default]
    NameInput,
    /// Game in progress.
    Playing,
    /// Game over; the result is final.
    Completed,
}

/// A turn-based game state machine.
///
/// ## Implementation Notes
///
/// - Inputs are synchronous; the only deferred work runs inside `advance_time`
/// - `revision` must change on every committed transition and only then
/// - `restore` drops in-flight deferred actions except those the snapshot
///   records as owed (a continue prompt that was already due)
/// - `restore` rejects a snapshot whose fields contradict each other; it
///   never pads or truncates saved data
/// - `session` is fixed at construction and survives snapshot/restore
pub trait GameMachine: Sized {
    /// Serializable image of every piece of game state.
    type Snapshot: Serialize + DeserializeOwned + Clone;

    /// Identifies the game in save slots.
    const GAME_TAG: &'static str;

    /// Current lifecycle phase.
    fn phase(&self) -> Phase;

    /// Player whose turn it is, if a game is in progress.
    fn current_player(&self) -> Option<PlayerId>;

    /// Final result once the game has completed.
    fn result(&self) -> Option<GameResult>;

    /// Forward host wall-clock time, firing any due deferred actions.
    fn advance_time(&mut self, ms: u64);

    /// Take all events emitted since the last drain.
    fn drain_events(&mut self) -> Vec<GameEvent>;

    /// Counter bumped on every committed state transition.
    fn revision(&self) -> u64;

    /// Identity of this game object. Two machines built separately never
    /// share one, so their revisions are never compared.
    fn session(&self) -> u64;

    /// Capture the current state.
    fn snapshot(&self) -> Self::Snapshot;

    /// Rebuild a machine from a snapshot, checking it is self-consistent.
    fn restore(snapshot: Self::Snapshot) -> Result<Self, RestoreError>;

    // === Convenience Methods ===

    /// Whether the game has finished.
    fn is_terminal(&self) -> bool {
        self.phase() == Phase::Completed
    }
}
