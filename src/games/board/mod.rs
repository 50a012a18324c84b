//! Snakes & ladders board: layout generation and the turn/challenge
//! state machine.

mod game;
mod layout;

pub use game::{
    BoardGame, BoardGameBuilder, BoardPlayer, BoardSnapshot, Challenge, MoveReport,
    PendingReward, RewardChoice,
};
pub use layout::{
    checkpoint_cells, generate_markers, row_cells, row_of, BoardLayout, ChallengeKind, MarkerKind,
};
