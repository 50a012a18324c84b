//! Versioned wrapper around saved state.
//!
//! Every save is tagged with the schema version and the game it belongs to.
//! Loading reads the tag first; a mismatch discards the save instead of
//! attempting a partial restore.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::{RestoreError, StorageError};

/// Current snapshot schema. Bump whenever a snapshot's shape changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Saved state plus its identifying tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub schema: u32,
    pub game: String,
    /// Host wall-clock time of the save, in seconds.
    pub saved_at_secs: u64,
    pub state: T,
}

impl<T> Envelope<T> {
    /// Wrap `state` under the current schema.
    pub fn new(game: impl Into<String>, saved_at_secs: u64, state: T) -> Self {
        Self {
            schema: SCHEMA_VERSION,
            game: game.into(),
            saved_at_secs,
            state,
        }
    }
}

#[derive(Deserialize)]
struct Header {
    schema: u32,
    game: String,
}

/// Byte format of a slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Codec {
    /// Human-readable; the default.
    #[default]
    Json,
    /// Compact binary.
    Bincode,
}

impl Codec {
    /// Serialize an envelope.
    pub fn encode<T: Serialize>(self, envelope: &Envelope<T>) -> Result<Vec<u8>, StorageError> {
        match self {
            Codec::Json => serde_json::to_vec(envelope)
                .map_err(|e| StorageError::Unavailable(format!("encode failed: {e}"))),
            Codec::Bincode => bincode::serialize(envelope)
                .map_err(|e| StorageError::Unavailable(format!("encode failed: {e}"))),
        }
    }

    /// Check the tag, then deserialize the whole envelope.
    pub fn decode<T: DeserializeOwned>(
        self,
        bytes: &[u8],
        expected_game: &str,
    ) -> Result<Envelope<T>, RestoreError> {
        let header: Header = self.parse(bytes)?;
        if header.schema != SCHEMA_VERSION {
            return Err(RestoreError::VersionMismatch {
                expected: SCHEMA_VERSION,
                found: header.schema,
            });
        }
        if header.game != expected_game {
            return Err(RestoreError::GameMismatch {
                expected: expected_game.to_string(),
                found: header.game,
            });
        }
        self.parse(bytes)
    }

    fn parse<D: DeserializeOwned>(self, bytes: &[u8]) -> Result<D, RestoreError> {
        match self {
            Codec::Json => {
                serde_json::from_slice(bytes).map_err(|e| RestoreError::Decode(e.to_string()))
            }
            Codec::Bincode => {
                bincode::deserialize(bytes).map_err(|e| RestoreError::Decode(e.to_string()))
            }
        }
    }
}
