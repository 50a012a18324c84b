//! Challenge-site question assignment.
//!
//! Both games pose questions at fixed sites: card positions in the match
//! game, marker and checkpoint cells on the board. The engine keeps each
//! site's question and wrong-answer history, the global asked set, and
//! rotates questions according to a caller-supplied `RotationPolicy`.

mod engine;
mod site;

pub use engine::{AssignmentEngine, Rotation, Verdict};
pub use site::SiteState;
