//! Persistence of in-progress games and settings.
//!
//! One slot per game, keyed by the game's tag. Hosts call
//! [`SaveSlot::autosave`] after each input; it writes only when the game's
//! revision moved or a different game took its place. At startup
//! [`SaveSlot::load`] restores the last save or returns `None` for a cold
//! start, including when the saved state fails validation.
//!
//! ```
//! use quiz_party::games::MatchGameBuilder;
//! use quiz_party::persistence::{MemorySlot, SaveSlot};
//! use quiz_party::rules::GameMachine;
//! use quiz_party::games::MatchGame;
//!
//! let mut game = MatchGameBuilder::new().build(1);
//! game.set_player_names("A", "B");
//!
//! let mut slot = SaveSlot::new(MemorySlot::new());
//! assert!(slot.autosave(&game, 0));
//! assert!(!slot.autosave(&game, 1));
//!
//! let restored: MatchGame = slot.load().unwrap();
//! assert_eq!(restored.snapshot(), game.snapshot());
//! ```

mod envelope;
mod save;
mod slot;

pub use envelope::{Codec, Envelope, SCHEMA_VERSION};
pub use save::SaveSlot;
pub use slot::{FileSlot, MemorySlot, StorageResult, StorageSlot};

/// Slot key of the match game.
pub const MATCH_GAME_KEY: &str = "match-game";
/// Slot key of the board game.
pub const BOARD_GAME_KEY: &str = "snakes-ladders";
/// Slot key of the volume settings.
pub const VOLUME_KEY: &str = "volume-settings";
