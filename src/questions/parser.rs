//! Line-oriented question file parsing.
//!
//! Fields are separated by `|`, trimmed, and empty fields are dropped before
//! counting. Blank lines are ignored. A malformed line is skipped with a
//! warning; it never fails the whole file.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use super::question::{Question, QuestionKind};
use crate::core::LoadError;

/// Fields required by the multiple-choice format.
const MULTIPLE_CHOICE_FIELDS: usize = 6;
/// Fields required by the free-answer format.
const FREE_ANSWER_FIELDS: usize = 2;

/// Why a single line was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LineIssue {
    /// Not enough non-empty fields.
    #[error("expected at least {needed} fields, found {found}")]
    TooFewFields {
        /// Minimum for this format.
        needed: usize,
        /// Non-empty fields present.
        found: usize,
    },
    /// Answer key outside A-D / 1-4.
    #[error("answer key {0:?} is not one of A, B, C, D, 1, 2, 3, 4")]
    InvalidKey(String),
}

/// Map an answer key (`A`-`D` or `1`-`4`, any case) to an option index.
#[must_use]
pub fn parse_answer_key(raw: &str) -> Option<usize> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "A" | "1" => Some(0),
        "B" | "2" => Some(1),
        "C" | "3" => Some(2),
        "D" | "4" => Some(3),
        _ => None,
    }
}

/// Parse one non-blank line into a question with the given ID.
pub fn parse_line(kind: QuestionKind, line: &str, id: u32) -> Result<Question, LineIssue> {
    let parts: Vec<&str> = line
        .split('|')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    match kind {
        QuestionKind::MultipleChoice => {
            if parts.len() < MULTIPLE_CHOICE_FIELDS {
                return Err(LineIssue::TooFewFields {
                    needed: MULTIPLE_CHOICE_FIELDS,
                    found: parts.len(),
                });
            }
            let key = parts[5];
            let correct_index =
                parse_answer_key(key).ok_or_else(|| LineIssue::InvalidKey(key.to_string()))?;
            let options = parts[1..5].iter().map(|s| s.to_string()).collect();
            Ok(Question::multiple_choice(id, parts[0], options, correct_index))
        }
        QuestionKind::FreeAnswer => {
            if parts.len() < FREE_ANSWER_FIELDS {
                return Err(LineIssue::TooFewFields {
                    needed: FREE_ANSWER_FIELDS,
                    found: parts.len(),
                });
            }
            let clues = parts[2..].iter().map(|s| s.to_string()).collect();
            Ok(Question::free_answer(id, parts[0], parts[1], clues))
        }
    }
}

/// Parse a whole file body. IDs are assigned 1, 2, 3… in order of the
/// lines that parse. Returns `LoadError::Empty` when nothing parsed.
pub fn parse_questions(kind: QuestionKind, text: &str) -> Result<Vec<Question>, LoadError> {
    let mut questions = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let next_id = questions.len() as u32 + 1;
        match parse_line(kind, line, next_id) {
            Ok(question) => questions.push(question),
            Err(issue) => {
                warn!(target: "questions", line = line_no + 1, %issue, content = line, "skipping malformed question line");
            }
        }
    }

    if questions.is_empty() {
        return Err(LoadError::Empty);
    }
    debug!(target: "questions", ?kind, count = questions.len(), "parsed question source");
    Ok(questions)
}

/// Read and parse a question file.
pub fn read_questions(kind: QuestionKind, path: impl AsRef<Path>) -> Result<Vec<Question>, LoadError> {
    let text = fs::read_to_string(path)?;
    parse_questions(kind, &text)
}
