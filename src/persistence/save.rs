//! Save slots for games and settings.

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::envelope::{Codec, Envelope};
use super::slot::StorageSlot;
use crate::core::RestoreError;
use crate::rules::GameMachine;

/// Reads and writes tagged state through a storage backend.
///
/// Write failures are logged and dropped; read failures of any kind read as
/// "nothing saved" through [`SaveSlot::load`]. Gameplay never blocks on
/// storage.
#[derive(Debug)]
pub struct SaveSlot<S> {
    storage: S,
    codec: Codec,
    /// Last (session, revision) written or read per game tag.
    saved: FxHashMap<&'static str, (u64, u64)>,
}

impl<S: StorageSlot> SaveSlot<S> {
    /// JSON slot over `storage`.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            codec: Codec::Json,
            saved: FxHashMap::default(),
        }
    }

    /// Switch the byte format.
    #[must_use]
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Give back the backend.
    pub fn into_inner(self) -> S {
        self.storage
    }

    // === Raw tagged state ===

    /// Write `state` under `key`. Returns whether it was stored.
    pub fn store<T: Serialize>(&mut self, key: &str, state: &T, now_secs: u64) -> bool {
        let envelope = Envelope::new(key, now_secs, state);
        let result = self
            .codec
            .encode(&envelope)
            .and_then(|bytes| self.storage.set(key, &bytes));
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(target: "persistence", key, error = %e, "save dropped");
                false
            }
        }
    }

    /// Read the state under `key`. `Ok(None)` when the slot is empty.
    pub fn try_fetch<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, RestoreError> {
        let Some(bytes) = self.storage.get(key)? else {
            return Ok(None);
        };
        let envelope: Envelope<T> = self.codec.decode(&bytes, key)?;
        Ok(Some(envelope.state))
    }

    /// Read the state under `key`, discarding anything unreadable.
    pub fn fetch<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        match self.try_fetch(key) {
            Ok(state) => state,
            Err(RestoreError::Storage(e)) => {
                warn!(target: "persistence", key, error = %e, "storage unreadable; starting fresh");
                None
            }
            Err(e) => {
                warn!(target: "persistence", key, error = %e, "discarding stale save");
                if let Err(e) = self.storage.remove(key) {
                    warn!(target: "persistence", key, error = %e, "could not clear stale save");
                }
                None
            }
        }
    }

    /// Clear `key`.
    pub fn clear(&mut self, key: &str) {
        self.saved.remove(key);
        if let Err(e) = self.storage.remove(key) {
            warn!(target: "persistence", key, error = %e, "clear failed");
        }
    }

    // === Games ===

    /// Snapshot `game` into its slot.
    pub fn save<G: GameMachine>(&mut self, game: &G, now_secs: u64) -> bool {
        let saved = self.store(G::GAME_TAG, &game.snapshot(), now_secs);
        if saved {
            self.mark(game);
            debug!(target: "persistence", game = G::GAME_TAG, revision = game.revision(), "saved");
        }
        saved
    }

    /// Save only if `game` changed since the last save of its kind through
    /// this slot. A different game instance always counts as a change.
    pub fn autosave<G: GameMachine>(&mut self, game: &G, now_secs: u64) -> bool {
        if self.saved.get(G::GAME_TAG) == Some(&(game.session(), game.revision())) {
            return false;
        }
        self.save(game, now_secs)
    }

    /// Restore the saved game, surfacing why it could not be.
    pub fn try_load<G: GameMachine>(&self) -> Result<Option<G>, RestoreError> {
        self.try_fetch::<G::Snapshot>(G::GAME_TAG)?
            .map(G::restore)
            .transpose()
    }

    /// Restore the saved game; anything unusable is discarded.
    pub fn load<G: GameMachine>(&mut self) -> Option<G> {
        let snapshot = self.fetch::<G::Snapshot>(G::GAME_TAG)?;
        match G::restore(snapshot) {
            Ok(game) => {
                self.mark(&game);
                Some(game)
            }
            Err(e) => {
                warn!(target: "persistence", game = G::GAME_TAG, error = %e, "discarding stale save");
                self.clear(G::GAME_TAG);
                None
            }
        }
    }

    fn mark<G: GameMachine>(&mut self, game: &G) {
        self.saved
            .insert(G::GAME_TAG, (game.session(), game.revision()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{BoardGame, BoardGameBuilder, MatchGame, MatchGameBuilder};
    use crate::persistence::MemorySlot;

    #[test]
    fn test_store_and_fetch() {
        let mut slot = SaveSlot::new(MemorySlot::new());
        assert!(slot.store("numbers", &vec![1u8, 2], 10));
        assert_eq!(slot.fetch::<Vec<u8>>("numbers"), Some(vec![1, 2]));
        assert_eq!(slot.fetch::<Vec<u8>>("missing"), None);
    }

    #[test]
    fn test_unavailable_storage_is_silent() {
        let mut slot = SaveSlot::new(MemorySlot::unavailable());
        assert!(!slot.store("numbers", &1u8, 0));
        assert_eq!(slot.fetch::<u8>("numbers"), None);
        assert!(matches!(
            slot.try_fetch::<u8>("numbers"),
            Err(RestoreError::Storage(_))
        ));
    }

    #[test]
    fn test_corrupt_save_is_discarded() {
        let mut slot = SaveSlot::new(MemorySlot::new());
        slot.storage_mut().set("numbers", b"{broken").unwrap();
        assert_eq!(slot.fetch::<u8>("numbers"), None);
        assert_eq!(slot.storage().get("numbers").unwrap(), None);
    }

    #[test]
    fn test_autosave_tracks_each_game_separately() {
        let mut game = MatchGameBuilder::new().build(1);
        game.set_player_names("A", "B");
        let mut board = BoardGameBuilder::new().build(1);
        board.set_player_names(["A", "B", "C"]);
        assert_eq!(game.revision(), board.revision());

        let mut slot = SaveSlot::new(MemorySlot::new());
        assert!(slot.autosave(&game, 0));
        assert!(slot.autosave(&board, 0));
        assert!(!slot.autosave(&game, 1));
        assert!(!slot.autosave(&board, 1));
        assert!(slot.load::<MatchGame>().is_some());
        assert!(slot.load::<BoardGame>().is_some());
    }

    #[test]
    fn test_autosave_new_game_at_same_revision() {
        let mut first = MatchGameBuilder::new().build(1);
        first.set_player_names("A", "B");
        let mut slot = SaveSlot::new(MemorySlot::new());
        assert!(slot.autosave(&first, 0));

        let mut second = MatchGameBuilder::new().build(1);
        second.set_player_names("C", "D");
        assert_eq!(first.revision(), second.revision());
        assert!(slot.autosave(&second, 1));

        let restored: MatchGame = slot.load().unwrap();
        assert_eq!(restored.player(crate::core::PlayerId::new(0)).unwrap().name, "C");
    }
}
