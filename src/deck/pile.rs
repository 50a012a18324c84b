use serde::{Deserialize, Serialize};

use super::shuffle::shuffled;
use crate::core::GameRng;

/// Cyclic draw pile.
///
/// Items come off a shuffled working copy in order. Once the last item of a
/// lap is dealt, a fresh shuffle of the full source becomes the next lap.
/// No item repeats within a lap; across a lap boundary the same item may
/// come up twice in a row.
///
/// ```
/// use quiz_party::core::GameRng;
/// use quiz_party::deck::Deck;
///
/// let mut rng = GameRng::new(3);
/// let mut deck = Deck::new(vec![1, 2, 3], &mut rng);
/// let mut lap: Vec<_> = (0..3).filter_map(|_| deck.draw_next(&mut rng)).collect();
/// lap.sort();
/// assert_eq!(lap, vec![1, 2, 3]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck<T> {
    source: Vec<T>,
    working: Vec<T>,
    cursor: usize,
    laps: u32,
}

impl<T: Clone> Deck<T> {
    /// Build a deck and shuffle its first lap.
    pub fn new(source: Vec<T>, rng: &mut GameRng) -> Self {
        let working = shuffled(rng, &source);
        Self {
            source,
            working,
            cursor: 0,
            laps: 0,
        }
    }

    /// Deal the next item. `None` only when the source is empty.
    pub fn draw_next(&mut self, rng: &mut GameRng) -> Option<T> {
        if self.working.is_empty() {
            return None;
        }
        let item = self.working.get(self.cursor).cloned();
        self.cursor += 1;
        if self.cursor >= self.working.len() {
            self.working = shuffled(rng, &self.source);
            self.cursor = 0;
            self.laps += 1;
        }
        item
    }

    /// Items left before the next reshuffle.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.working.len() - self.cursor
    }

    /// The current lap in deal order (already dealt items included).
    #[must_use]
    pub fn lap(&self) -> &[T] {
        &self.working
    }

    /// Completed laps so far.
    #[must_use]
    pub fn laps(&self) -> u32 {
        self.laps
    }

    /// Number of items in the full source.
    #[must_use]
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Whether the source is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}
