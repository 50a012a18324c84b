//! Cards and players of the match game.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Rows used to lay the 14 cards out on screen.
pub const ROW_PATTERN: [usize; 4] = [3, 4, 4, 3];

/// One card on the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Face value; exactly two cards share each value.
    pub face: u32,
    /// Face up after a correct answer.
    pub flipped: bool,
    /// Paired with its twin.
    pub matched: bool,
}

impl Card {
    /// Face-down card with the given value.
    #[must_use]
    pub const fn new(face: u32) -> Self {
        Self {
            face,
            flipped: false,
            matched: false,
        }
    }

    /// Whether the card can still be clicked.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !self.flipped && !self.matched
    }
}

/// A team in the match game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPlayer {
    /// Display name.
    pub name: String,
    /// Card points plus match bonuses.
    pub points: u32,
    /// Pairs completed; first tie-breaker.
    pub matches: u32,
    /// Questions answered, right or wrong.
    pub attempts: u32,
}

impl MatchPlayer {
    /// Player with a name and zeroed counters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: 0,
            matches: 0,
            attempts: 0,
        }
    }

    /// Zero the counters, keeping the name.
    pub fn clear(&mut self) {
        self.points = 0;
        self.matches = 0;
        self.attempts = 0;
    }
}

/// Split `count` cards into display rows following [`ROW_PATTERN`],
/// repeating the last row size for any overflow.
#[must_use]
pub fn card_rows(count: usize) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while start < count {
        let size = ROW_PATTERN
            .get(i)
            .copied()
            .unwrap_or(ROW_PATTERN[ROW_PATTERN.len() - 1]);
        let end = (start + size).min(count);
        rows.push(start..end);
        start = end;
        i = (i + 1) % ROW_PATTERN.len();
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_rows_for_full_table() {
        let rows = card_rows(14);
        assert_eq!(rows, vec![0..3, 3..7, 7..11, 11..14]);
    }

    #[test]
    fn test_card_rows_wraps_pattern() {
        let rows = card_rows(16);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[4], 14..16);
        assert!(card_rows(0).is_empty());
    }

    #[test]
    fn test_card_availability() {
        let mut card = Card::new(3);
        assert!(card.is_available());
        card.flipped = true;
        assert!(!card.is_available());
    }
}
