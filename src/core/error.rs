//! Error types.
//!
//! None of these are fatal to a running game. Question loading recovers to a
//! built-in set, restore failures read as "no saved state", and rejected
//! player inputs leave the state untouched.

use std::io;

use thiserror::Error;

use crate::core::PlayerId;

/// Why a question source could not be used.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("question source unreadable: {0}")]
    Io(#[from] io::Error),
    /// The source was readable but had no valid line.
    #[error("question source has no valid lines")]
    Empty,
}

/// Error raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure.
    #[error("storage i/o failed for {key}")]
    Io {
        /// Slot key being accessed.
        key: String,
        #[source]
        source: io::Error,
    },
    /// Backend refused or is unavailable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Why a saved snapshot was not restored.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// Slot could not be read.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Bytes did not decode into the expected shape.
    #[error("snapshot could not be decoded: {0}")]
    Decode(String),
    /// Snapshot written by a different schema.
    #[error("snapshot schema {found} does not match expected {expected}")]
    VersionMismatch {
        /// Schema this build reads.
        expected: u32,
        /// Schema stored in the slot.
        found: u32,
    },
    /// Snapshot belongs to another game.
    #[error("snapshot is for {found:?}, expected {expected:?}")]
    GameMismatch {
        /// Game tag this slot should hold.
        expected: String,
        /// Game tag found in the slot.
        found: String,
    },
    /// Snapshot decoded but its fields contradict each other.
    #[error("snapshot is inconsistent: {0}")]
    Inconsistent(String),
}

impl RestoreError {
    /// `Inconsistent(what)` unless `ok`.
    pub(crate) fn require(ok: bool, what: &str) -> Result<(), RestoreError> {
        if ok {
            Ok(())
        } else {
            Err(RestoreError::Inconsistent(what.to_string()))
        }
    }
}

/// A player input the state machine rejected. State is unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    /// No game in progress (names not set, completed, or paused).
    #[error("game is not in progress")]
    NotPlaying,
    /// Input guard active (click debounce or animation lock).
    #[error("input is locked")]
    InputLocked,
    /// No question is open for this input.
    #[error("no question is open")]
    NoOpenQuestion,
    /// A question or choice is already on screen.
    #[error("another prompt is already open")]
    PromptOpen,
    /// No continue-or-end choice is on screen.
    #[error("no continue choice is pending")]
    NoChoicePending,
    /// Card index outside the table.
    #[error("card {0} does not exist")]
    InvalidCard(usize),
    /// Card already face up or matched.
    #[error("card {0} is not available")]
    CardUnavailable(usize),
    /// The current player has used every attempt this turn.
    #[error("no attempts left this turn")]
    TurnExhausted,
    /// Option index out of range or disabled at this site.
    #[error("option {0} cannot be chosen")]
    OptionDisabled(usize),
    /// No challenge is open.
    #[error("no challenge is open")]
    NoChallenge,
    /// An optional challenge needs an answerer before it can be judged.
    #[error("challenge has no answerer yet")]
    AnswererRequired,
    /// Player not seated at this table.
    #[error("{0} is not at this table")]
    UnknownPlayer(PlayerId),
    /// Player already reached the final cell.
    #[error("{0} has already finished")]
    PlayerFinished(PlayerId),
    /// A shot cannot target this player.
    #[error("{0} cannot be targeted")]
    InvalidTarget(PlayerId),
    /// No reward is waiting to be claimed.
    #[error("no reward is pending")]
    NoReward,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RestoreError::VersionMismatch {
            expected: 2,
            found: 1,
        };
        assert_eq!(err.to_string(), "snapshot schema 1 does not match expected 2");

        let err = ActionError::UnknownPlayer(PlayerId::new(4));
        assert_eq!(err.to_string(), "Player 5 is not at this table");
    }

    #[test]
    fn test_storage_error_wraps_into_restore() {
        let err: RestoreError = StorageError::Unavailable("locked".into()).into();
        assert!(matches!(err, RestoreError::Storage(_)));
    }
}
