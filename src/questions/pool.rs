//! Question pool: the loaded questions of one game, with lookup and draws.
//!
//! Loading never fails. When the source is unreadable or has no valid line,
//! the pool falls back to a small built-in set so the game stays playable
//! and records what went wrong in `load_error`.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::parser::{parse_questions, read_questions};
use super::question::{Question, QuestionId, QuestionKind};
use crate::core::{GameRng, LoadError};

/// Ordered collection of questions with stable IDs.
///
/// ## Example
///
/// ```
/// use quiz_party::questions::{QuestionKind, QuestionPool, QuestionId};
///
/// let pool = QuestionPool::from_text(QuestionKind::FreeAnswer, "Q1 | one\nQ2 | two\n");
/// assert_eq!(pool.len(), 2);
/// assert_eq!(pool.get_by_id(QuestionId::new(2)).unwrap().text, "Q2");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PoolRepr", into = "PoolRepr")]
pub struct QuestionPool {
    kind: QuestionKind,
    questions: Vec<Question>,
    index: FxHashMap<QuestionId, usize>,
    load_error: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct PoolRepr {
    kind: QuestionKind,
    questions: Vec<Question>,
    load_error: Option<String>,
}

impl From<PoolRepr> for QuestionPool {
    fn from(repr: PoolRepr) -> Self {
        let mut pool = QuestionPool::from_questions(repr.kind, repr.questions);
        pool.load_error = repr.load_error;
        pool
    }
}

impl From<QuestionPool> for PoolRepr {
    fn from(pool: QuestionPool) -> Self {
        Self {
            kind: pool.kind,
            questions: pool.questions,
            load_error: pool.load_error,
        }
    }
}

impl QuestionPool {
    /// Wrap already-parsed questions. An empty pool is allowed here.
    #[must_use]
    pub fn from_questions(kind: QuestionKind, questions: Vec<Question>) -> Self {
        let index = questions
            .iter()
            .enumerate()
            .map(|(i, q)| (q.id, i))
            .collect();
        Self {
            kind,
            questions,
            index,
            load_error: None,
        }
    }

    /// Parse in-memory file contents, falling back when nothing parses.
    #[must_use]
    pub fn from_text(kind: QuestionKind, text: &str) -> Self {
        Self::recover(kind, parse_questions(kind, text))
    }

    /// Read a question file, falling back when it is unreadable or empty.
    #[must_use]
    pub fn load_file(kind: QuestionKind, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let result = read_questions(kind, path);
        if let Ok(questions) = &result {
            info!(target: "questions", path = %path.display(), count = questions.len(), "loaded questions");
        }
        Self::recover(kind, result)
    }

    /// The built-in set for `kind`.
    #[must_use]
    pub fn fallback(kind: QuestionKind) -> Self {
        Self::from_questions(kind, fallback_questions(kind))
    }

    fn recover(kind: QuestionKind, result: Result<Vec<Question>, LoadError>) -> Self {
        match result {
            Ok(questions) => Self::from_questions(kind, questions),
            Err(err) => {
                error!(target: "questions", ?kind, error = %err, "question source unusable; using built-in questions");
                let mut pool = Self::fallback(kind);
                pool.load_error = Some(err.to_string());
                pool
            }
        }
    }

    /// Format of the questions in this pool.
    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    /// Why the source was replaced by the fallback set, if it was.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the pool has no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// All questions in load order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// All IDs in load order.
    #[must_use]
    pub fn ids(&self) -> Vec<QuestionId> {
        self.questions.iter().map(|q| q.id).collect()
    }

    /// Whether `id` is in the pool.
    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.index.contains_key(&id)
    }

    /// Look up by ID, falling back to the first question when the ID is
    /// unknown. `None` only for an empty pool.
    #[must_use]
    pub fn get_by_id(&self, id: QuestionId) -> Option<&Question> {
        match self.index.get(&id) {
            Some(&i) => self.questions.get(i),
            None => {
                warn!(target: "questions", %id, "question not found; falling back to first question");
                self.questions.first()
            }
        }
    }

    /// Uniformly random question. `None` for an empty pool.
    pub fn get_random(&self, rng: &mut GameRng) -> Option<&Question> {
        rng.choose(&self.questions)
    }
}

/// Hard-coded questions used when the source is unusable.
#[must_use]
pub fn fallback_questions(kind: QuestionKind) -> Vec<Question> {
    match kind {
        QuestionKind::MultipleChoice => vec![
            Question::multiple_choice(
                1,
                "Apa itu phishing?",
                vec![
                    "Upaya mengelabui pengguna untuk mencuri data".into(),
                    "Teknik enkripsi data".into(),
                    "Metode backup harian".into(),
                    "Perangkat firewall".into(),
                ],
                0,
            ),
            Question::multiple_choice(
                2,
                "Kata sandi yang kuat sebaiknya?",
                vec![
                    "Menggunakan tanggal lahir".into(),
                    "Pendek dan mudah diingat".into(),
                    "Panjang, unik, dan kombinasi karakter".into(),
                    "Sama untuk semua akun".into(),
                ],
                2,
            ),
        ],
        QuestionKind::FreeAnswer => vec![
            Question::free_answer(1, "Apa itu phishing?", "phishing", Vec::new()),
            Question::free_answer(2, "Kepanjangan MFA?", "multi faktor", Vec::new()),
        ],
    }
}
