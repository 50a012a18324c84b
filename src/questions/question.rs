//! Question records.
//!
//! A `Question` is immutable once loaded. Its `QuestionBody` is one of two
//! variants of the same capability:
//! - multiple choice (board game): four options and a correct index
//! - free answer with clues (match game): an answer string and optional hints

use serde::{Deserialize, Serialize};

/// Stable 1-based identifier, unique within one load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub u32);

impl QuestionId {
    /// Create a new question ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// Which question-file format a pool holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    /// `question | A | B | C | D | key`
    MultipleChoice,
    /// `question | answer | clue1 | clue2 | ...`
    FreeAnswer,
}

/// Variant-specific content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionBody {
    /// Pick one of the options.
    MultipleChoice {
        /// Options in display order.
        options: Vec<String>,
        /// Index of the right option.
        correct_index: usize,
    },
    /// Type the answer; letters of it can be revealed as clues.
    FreeAnswer {
        /// Expected answer.
        answer: String,
        /// Extra hints, in file order.
        clues: Vec<String>,
    },
}

/// A parsed question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier.
    pub id: QuestionId,
    /// Prompt shown to players.
    pub text: String,
    /// Options or answer.
    pub body: QuestionBody,
}

impl Question {
    /// Build a multiple-choice question.
    #[must_use]
    pub fn multiple_choice(
        id: u32,
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
    ) -> Self {
        Self {
            id: QuestionId(id),
            text: text.into(),
            body: QuestionBody::MultipleChoice {
                options,
                correct_index,
            },
        }
    }

    /// Build a free-answer question.
    #[must_use]
    pub fn free_answer(
        id: u32,
        text: impl Into<String>,
        answer: impl Into<String>,
        clues: Vec<String>,
    ) -> Self {
        Self {
            id: QuestionId(id),
            text: text.into(),
            body: QuestionBody::FreeAnswer {
                answer: answer.into(),
                clues,
            },
        }
    }

    /// Format this question belongs to.
    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        match self.body {
            QuestionBody::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            QuestionBody::FreeAnswer { .. } => QuestionKind::FreeAnswer,
        }
    }

    /// Options for multiple-choice questions; empty otherwise.
    #[must_use]
    pub fn options(&self) -> &[String] {
        match &self.body {
            QuestionBody::MultipleChoice { options, .. } => options,
            QuestionBody::FreeAnswer { .. } => &[],
        }
    }

    /// Correct option index for multiple-choice questions.
    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        match self.body {
            QuestionBody::MultipleChoice { correct_index, .. } => Some(correct_index),
            QuestionBody::FreeAnswer { .. } => None,
        }
    }

    /// Whether `option` is the right choice. Always false for free-answer questions.
    #[must_use]
    pub fn is_correct_option(&self, option: usize) -> bool {
        self.correct_index() == Some(option)
    }

    /// Expected answer for free-answer questions.
    #[must_use]
    pub fn answer(&self) -> Option<&str> {
        match &self.body {
            QuestionBody::FreeAnswer { answer, .. } => Some(answer),
            QuestionBody::MultipleChoice { .. } => None,
        }
    }

    /// Hints for free-answer questions; empty otherwise.
    #[must_use]
    pub fn clues(&self) -> &[String] {
        match &self.body {
            QuestionBody::FreeAnswer { clues, .. } => clues,
            QuestionBody::MultipleChoice { .. } => &[],
        }
    }
}
