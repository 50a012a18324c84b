//! # quiz-party
//!
//! Game-state core for two quiz-gated party games: a memory match card game
//! and a snakes & ladders board game.
//!
//! ## Design Principles
//!
//! 1. **Synchronous State Machines**: Every input is a method call that
//!    either commits a transition or returns an `ActionError` and changes
//!    nothing. Delayed work (continue-choice prompt, click debounce) runs
//!    inside `advance_time`, driven by the host's clock.
//!
//! 2. **Events, Not Side Effects**: Machines emit `GameEvent`s. Rendering and
//!    audio consume them; correctness never depends on anyone listening.
//!
//! 3. **Snapshot Everything**: Each machine produces a serializable snapshot
//!    on demand and bumps a revision on every committed transition, so the
//!    persistence layer can save after any change and restore at startup.
//!
//! ## Architecture
//!
//! - **Deterministic Randomness**: one seeded `GameRng` per game drives
//!   shuffles, marker layout and question draws.
//!
//! - **Persistent Data Structures**: site maps use `im` so snapshots clone
//!   in O(1).
//!
//! ## Modules
//!
//! - `core`: players, RNG, configuration, host-driven time, errors
//! - `questions`: question records, file parsing, question pool
//! - `deck`: Fisher–Yates shuffle and lap-based draw pile
//! - `assignment`: per-site question assignment and rotation
//! - `rules`: `GameMachine` trait, phases, results, events
//! - `games`: the match game and the board game
//! - `persistence`: storage backends and versioned save slots
//! - `audio`: sound cues and the host audio sink

pub mod assignment;
pub mod audio;
pub mod core;
pub mod deck;
pub mod games;
pub mod persistence;
pub mod questions;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    format_time, ActionError, BoardConfig, GameRng, GameRngState, GameTimer, LoadError,
    MatchConfig, PlayerId, PlayerMap, RestoreError, RotationPolicy, StorageError,
};

pub use crate::questions::{Question, QuestionId, QuestionKind, QuestionPool};

pub use crate::deck::{shuffle, Deck};

pub use crate::assignment::{AssignmentEngine, Rotation, SiteState, Verdict};

pub use crate::rules::{GameEvent, GameMachine, GameResult, Phase};

pub use crate::games::board::{ChallengeKind, MarkerKind, RewardChoice};
pub use crate::games::{BoardGame, BoardGameBuilder, MatchGame, MatchGameBuilder};

pub use crate::persistence::{Codec, FileSlot, MemorySlot, SaveSlot, StorageSlot};

pub use crate::audio::{AudioSink, SoundCue, VolumeSettings};
