//! Semantic notifications emitted by the state machines.
//!
//! Events are fire-and-forget: hosts drain them after each input to drive
//! animations and sound (see [`crate::audio::SoundCue::for_event`]). Game
//! correctness never depends on anyone consuming them.

use serde::{Deserialize, Serialize};

use super::engine::GameResult;
use crate::core::PlayerId;
use crate::games::board::ChallengeKind;

/// Something that happened in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    // === Shared ===
    /// Names were entered and play began.
    GameStarted,
    /// Whose turn it is changed.
    TurnPassed {
        /// Player now on turn.
        player: PlayerId,
    },
    /// Points were added to a player's score.
    PointGain {
        /// Scoring player.
        player: PlayerId,
        /// Points added.
        amount: u32,
    },
    /// The game reached its final result.
    GameFinished(GameResult),

    // === Match game ===
    /// A card's question was opened.
    CardOpened {
        /// Table index of the card (0-based).
        card: usize,
    },
    /// A clue letter was revealed for the open card.
    ClueRevealed {
        /// Table index of the card.
        card: usize,
        /// Character index in the answer.
        index: usize,
    },
    /// A card was answered wrongly.
    WrongAnswer {
        /// Answering player.
        player: PlayerId,
        /// Table index of the card.
        card: usize,
    },
    /// Two face-up cards with equal faces were paired.
    MatchFound {
        /// Scoring player.
        player: PlayerId,
        /// The two card indices.
        cards: (usize, usize),
    },
    /// The continue-or-end-turn prompt is on screen.
    ContinueOffered {
        /// Player being asked.
        player: PlayerId,
    },
    /// Play paused.
    Paused,
    /// Play resumed.
    Resumed,

    // === Board game ===
    /// A token moved.
    PlayerMoved {
        /// Moving player.
        player: PlayerId,
        /// Cell before the move.
        from: u32,
        /// Cell after the move.
        to: u32,
    },
    /// A challenge opened on a cell.
    ChallengeOpened {
        /// Player who landed on or crossed the cell.
        player: PlayerId,
        /// Board cell.
        cell: u32,
        /// Marker or checkpoint classification.
        kind: ChallengeKind,
    },
    /// A challenge was judged.
    ChallengeResolved {
        /// Board cell.
        cell: u32,
        /// Player who answered.
        answerer: PlayerId,
        /// Whether the answer was right.
        correct: bool,
    },
    /// An optional challenge was declined.
    ChallengeDeclined {
        /// Board cell.
        cell: u32,
    },
    /// A player took a shield as reward.
    ShieldGained {
        /// Rewarded player.
        player: PlayerId,
    },
    /// A player shot another as reward.
    Shot {
        /// Rewarded player.
        shooter: PlayerId,
        /// Player targeted.
        target: PlayerId,
    },
    /// A shot was absorbed by the target's shield.
    ShieldBroken {
        /// Shielded player.
        player: PlayerId,
    },
    /// A player reached the final cell.
    PlayerFinished {
        /// Finishing player.
        player: PlayerId,
        /// 1-based finishing rank.
        rank: u32,
    },
}

impl GameEvent {
    /// Player an event is about, if any.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            GameEvent::TurnPassed { player }
            | GameEvent::PointGain { player, .. }
            | GameEvent::WrongAnswer { player, .. }
            | GameEvent::MatchFound { player, .. }
            | GameEvent::ContinueOffered { player }
            | GameEvent::PlayerMoved { player, .. }
            | GameEvent::ChallengeOpened { player, .. }
            | GameEvent::ShieldGained { player }
            | GameEvent::ShieldBroken { player }
            | GameEvent::PlayerFinished { player, .. } => Some(*player),
            GameEvent::ChallengeResolved { answerer, .. } => Some(*answerer),
            GameEvent::Shot { shooter, .. } => Some(*shooter),
            _ => None,
        }
    }
}
