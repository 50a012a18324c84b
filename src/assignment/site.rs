//! Per-site question bookkeeping.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::questions::QuestionId;

/// State of one challenge site (a card position or a board cell).
///
/// Wrong options are sticky: once marked they stay disabled until the
/// site's question is replaced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteState {
    /// Question currently posed at this site.
    pub question: QuestionId,

    /// Option indices answered wrongly, ascending, no duplicates.
    pub wrong_options: SmallVec<[usize; 4]>,

    /// Wrong answers given since the question was assigned.
    pub wrong_attempts: u32,

    /// Whether an answerer has committed to this question.
    pub asked: bool,

    /// Revealed answer-character indices, in reveal order.
    pub revealed: SmallVec<[usize; 2]>,
}

impl SiteState {
    /// Fresh state for a newly assigned question.
    #[must_use]
    pub fn new(question: QuestionId) -> Self {
        Self {
            question,
            wrong_options: SmallVec::new(),
            wrong_attempts: 0,
            asked: false,
            revealed: SmallVec::new(),
        }
    }

    /// Whether `option` has been disabled at this site.
    #[must_use]
    pub fn is_disabled(&self, option: usize) -> bool {
        self.wrong_options.binary_search(&option).is_ok()
    }

    /// Record a wrong answer, disabling `option` if one was chosen.
    pub fn record_wrong(&mut self, option: Option<usize>) {
        if let Some(option) = option {
            if let Err(pos) = self.wrong_options.binary_search(&option) {
                self.wrong_options.insert(pos, option);
            }
        }
        self.wrong_attempts += 1;
    }

    /// Record a revealed character index, up to `max` reveals.
    /// Returns whether the index was newly recorded.
    pub fn record_reveal(&mut self, index: usize, max: usize) -> bool {
        if self.revealed.len() >= max || self.revealed.contains(&index) {
            return false;
        }
        self.revealed.push(index);
        true
    }
}
