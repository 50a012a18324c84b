//! Core building blocks shared by both games: players, RNG, configuration,
//! host-driven time, and error types.

pub mod clock;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use clock::{format_time, GameTimer, Scheduler, Ticket};
pub use config::{BoardConfig, MatchConfig, RotationPolicy};
pub use error::{ActionError, LoadError, RestoreError, StorageError};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
