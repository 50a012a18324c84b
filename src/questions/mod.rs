//! Quiz questions: records, file parsing, and the per-game pool.
//!
//! - `Question`: immutable record with a stable `QuestionId`
//! - `parser`: pipe-delimited line formats for both games
//! - `QuestionPool`: lookup by ID, random draw, built-in fallback set

pub mod parser;
pub mod pool;
pub mod question;

pub use parser::{parse_answer_key, parse_line, parse_questions, read_questions, LineIssue};
pub use pool::{fallback_questions, QuestionPool};
pub use question::{Question, QuestionBody, QuestionId, QuestionKind};
