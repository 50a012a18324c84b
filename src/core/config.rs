//! Game configuration types.
//!
//! Both games are fixed designs: seven pairs of cards for the match game and
//! a 7×7 board with three players for snakes & ladders. The values still live
//! in config structs so there is one place to read them, tests can shorten
//! delays, and snapshots carry the settings they were played with.
//!
//! - `RotationPolicy`: when a challenge site swaps its question
//! - `MatchConfig`: match-game scoring, turn and timing constants
//! - `BoardConfig`: board-game layout, movement and reward constants

use serde::{Deserialize, Serialize};

/// When a challenge site replaces its assigned question.
///
/// The match game rotates a card's question after its third wrong answer;
/// the board game rotates checkpoint questions after every wrong answer and
/// marker questions after the second. Both rotate after a correct answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPolicy {
    /// Rotate as soon as the site is answered correctly.
    pub on_correct: bool,

    /// Rotate once this many wrong answers have accumulated on the site.
    /// `Some(1)` rotates immediately after any wrong answer, `None` never.
    pub wrong_threshold: Option<u32>,
}

impl RotationPolicy {
    /// Rotate after any answer, right or wrong.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            on_correct: true,
            wrong_threshold: Some(1),
        }
    }

    /// Rotate after a correct answer or after `threshold` wrong answers.
    #[must_use]
    pub const fn after_wrong(threshold: u32) -> Self {
        Self {
            on_correct: true,
            wrong_threshold: Some(threshold),
        }
    }

    /// Whether a site with `wrong_attempts` accumulated should rotate now.
    #[must_use]
    pub fn wrong_limit_reached(&self, wrong_attempts: u32) -> bool {
        matches!(self.wrong_threshold, Some(limit) if wrong_attempts >= limit.max(1))
    }
}

/// Match-game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Number of face-value pairs on the table (14 cards).
    pub pairs: u32,

    /// Points every card starts with.
    pub card_points: u32,

    /// Points deducted from the open card for each revealed clue.
    pub clue_penalty: u32,

    /// Maximum clues revealed per card question.
    pub max_clues: usize,

    /// Bonus added to the scorer when a pair is completed.
    pub match_bonus: u32,

    /// Cards a player may open in one turn.
    pub attempts_per_turn: u32,

    /// Wrong answers on one card before its question is swapped.
    pub wrong_rotation_threshold: u32,

    /// Delay before offering the continue-or-end-turn choice.
    pub continue_delay_ms: u64,

    /// Click guard while a question is opening.
    pub click_debounce_ms: u64,

    /// Default team names shown before name entry.
    pub player_names: [String; 2],
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            pairs: 7,
            card_points: 100,
            clue_penalty: 20,
            max_clues: 2,
            match_bonus: 100,
            attempts_per_turn: 2,
            wrong_rotation_threshold: 3,
            continue_delay_ms: 1000,
            click_debounce_ms: 500,
            player_names: ["Kelompok 1".to_string(), "Kelompok 2".to_string()],
        }
    }
}

impl MatchConfig {
    /// Total cards on the table.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.pairs as usize * 2
    }

    /// Rotation policy for card questions.
    #[must_use]
    pub fn rotation(&self) -> RotationPolicy {
        RotationPolicy::after_wrong(self.wrong_rotation_threshold)
    }

    /// Override the continue-choice delay.
    #[must_use]
    pub fn with_continue_delay(mut self, ms: u64) -> Self {
        self.continue_delay_ms = ms;
        self
    }

    /// Override the click debounce.
    #[must_use]
    pub fn with_click_debounce(mut self, ms: u64) -> Self {
        self.click_debounce_ms = ms;
        self
    }
}

/// Board-game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Board edge length; cells are numbered `1..=size*size`.
    pub size: u32,

    /// Smallest step count the game master can set.
    pub min_steps: u32,

    /// Largest step count the game master can set.
    pub max_steps: u32,

    /// Wrong answers on a marker cell before its question is swapped.
    pub marker_wrong_threshold: u32,

    /// One supplementary marker per this many leftover eligible cells.
    pub extra_marker_divisor: usize,

    /// Cells a shot pushes its target back.
    pub shot_pushback: u32,

    /// Default team names, in table order (three players).
    pub player_names: [String; 3],
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: 7,
            min_steps: 1,
            max_steps: 6,
            marker_wrong_threshold: 2,
            extra_marker_divisor: 4,
            shot_pushback: 3,
            player_names: [
                "Kelompok 1".to_string(),
                "Kelompok 2".to_string(),
                "Kelompok 3".to_string(),
            ],
        }
    }
}

impl BoardConfig {
    /// Final cell number.
    #[must_use]
    pub fn max_cell(&self) -> u32 {
        self.size * self.size
    }

    /// Rotation policy for optional/forced marker cells.
    #[must_use]
    pub fn marker_rotation(&self) -> RotationPolicy {
        RotationPolicy::after_wrong(self.marker_wrong_threshold)
    }

    /// Rotation policy for checkpoint cells.
    #[must_use]
    pub fn checkpoint_rotation(&self) -> RotationPolicy {
        RotationPolicy::immediate()
    }

    /// Override the board edge length.
    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Override the shot pushback distance.
    #[must_use]
    pub fn with_shot_pushback(mut self, cells: u32) -> Self {
        self.shot_pushback = cells;
        self
    }
}
