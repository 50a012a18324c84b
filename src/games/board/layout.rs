//! Board geometry: checkpoints and challenge markers.
//!
//! Cells are numbered `1..=size*size` in zigzag order. Logical row 0 holds
//! the start cell and runs left to right; odd rows run right to left.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::core::GameRng;
use crate::deck::shuffled;

/// Marker printed on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    /// "?" cell: the lander may decline or hand the question to someone.
    Optional,
    /// "!" cell: the lander must answer.
    Forced,
}

/// What opened a challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeKind {
    /// Landed on an optional marker.
    Optional,
    /// Landed on a forced marker.
    Forced,
    /// Crossed a checkpoint for the first time.
    Checkpoint,
}

impl ChallengeKind {
    /// Whether the lander answers without a choice.
    #[must_use]
    pub fn is_forced(self) -> bool {
        !matches!(self, ChallengeKind::Optional)
    }
}

impl From<MarkerKind> for ChallengeKind {
    fn from(kind: MarkerKind) -> Self {
        match kind {
            MarkerKind::Optional => ChallengeKind::Optional,
            MarkerKind::Forced => ChallengeKind::Forced,
        }
    }
}

/// Logical row (0 = start row) of a cell.
#[must_use]
pub fn row_of(cell: u32, size: u32) -> u32 {
    (cell.saturating_sub(1)) / size.max(1)
}

/// Cells of a logical row, ascending.
pub fn row_cells(row: u32, size: u32) -> impl Iterator<Item = u32> {
    (row * size + 1)..=((row + 1) * size)
}

/// Checkpoint cells: the last cell of every odd interior row, where the
/// serpentine path turns. Boards of edge 2 or less have none.
#[must_use]
pub fn checkpoint_cells(size: u32) -> Vec<u32> {
    if size <= 2 {
        return Vec::new();
    }
    (1..size - 1)
        .filter(|row| row % 2 == 1)
        .map(|row| (row + 1) * size)
        .collect()
}

/// Scatter optional and forced markers over the board.
///
/// Start, finish and checkpoint cells never carry a marker. Each row with
/// two or more eligible cells gets at least one of each kind; a row with a
/// single eligible cell gets one marker whose kind alternates with row
/// parity. Then one in `divisor` of the still-unmarked eligible cells is
/// marked, half optional and the rest forced.
pub fn generate_markers(
    size: u32,
    checkpoints: &[u32],
    divisor: usize,
    rng: &mut GameRng,
) -> OrdMap<u32, MarkerKind> {
    let last = size * size;
    let eligible = |cell: &u32| *cell != 1 && *cell != last && !checkpoints.contains(cell);
    let mut markers = OrdMap::new();

    for row in 0..size {
        let cells: Vec<u32> = row_cells(row, size).filter(eligible).collect();
        match cells.len() {
            0 => {}
            1 => {
                let kind = if row % 2 == 0 {
                    MarkerKind::Optional
                } else {
                    MarkerKind::Forced
                };
                markers.insert(cells[0], kind);
            }
            _ => {
                let picks = shuffled(rng, &cells);
                markers.insert(picks[0], MarkerKind::Optional);
                markers.insert(picks[1], MarkerKind::Forced);
            }
        }
    }

    let rest: Vec<u32> = (2..last)
        .filter(eligible)
        .filter(|cell| !markers.contains_key(cell))
        .collect();
    let count = rest.len() / divisor.max(1);
    let chosen = shuffled(rng, &rest);
    let half = count / 2;
    for (i, cell) in chosen.into_iter().take(count).enumerate() {
        let kind = if i < half {
            MarkerKind::Optional
        } else {
            MarkerKind::Forced
        };
        markers.insert(cell, kind);
    }
    markers
}

/// Checkpoints and markers of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    size: u32,
    checkpoints: Vec<u32>,
    markers: OrdMap<u32, MarkerKind>,
}

impl BoardLayout {
    /// Fresh layout with new random markers.
    pub fn generate(size: u32, divisor: usize, rng: &mut GameRng) -> Self {
        let checkpoints = checkpoint_cells(size);
        let markers = generate_markers(size, &checkpoints, divisor, rng);
        Self {
            size,
            checkpoints,
            markers,
        }
    }

    /// Board edge length.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Final cell.
    #[must_use]
    pub fn max_cell(&self) -> u32 {
        self.size * self.size
    }

    #[must_use]
    pub fn checkpoints(&self) -> &[u32] {
        &self.checkpoints
    }

    #[must_use]
    pub fn markers(&self) -> &OrdMap<u32, MarkerKind> {
        &self.markers
    }

    #[must_use]
    pub fn marker_at(&self, cell: u32) -> Option<MarkerKind> {
        self.markers.get(&cell).copied()
    }

    #[must_use]
    pub fn is_checkpoint(&self, cell: u32) -> bool {
        self.checkpoints.contains(&cell)
    }

    /// Every cell that can pose a question, ascending.
    #[must_use]
    pub fn challenge_cells(&self) -> Vec<u32> {
        let mut cells: Vec<u32> = self.markers.keys().copied().collect();
        cells.extend(self.checkpoints.iter().copied());
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    /// First checkpoint strictly after `from` up to and including `to`, in
    /// the direction of travel, that `visited` does not contain.
    pub fn crossed_checkpoint(
        &self,
        from: u32,
        to: u32,
        visited: impl Fn(u32) -> bool,
    ) -> Option<u32> {
        let path: Box<dyn Iterator<Item = u32>> = if to > from {
            Box::new(from + 1..=to)
        } else if to < from {
            Box::new((to..from).rev())
        } else {
            return None;
        };
        path.into_iter()
            .find(|&cell| self.is_checkpoint(cell) && !visited(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoints_on_seven_by_seven() {
        assert_eq!(checkpoint_cells(7), vec![14, 28, 42]);
        assert!(checkpoint_cells(2).is_empty());
        assert_eq!(checkpoint_cells(4), vec![8]);
    }

    #[test]
    fn test_row_helpers() {
        assert_eq!(row_of(1, 7), 0);
        assert_eq!(row_of(7, 7), 0);
        assert_eq!(row_of(8, 7), 1);
        assert_eq!(row_of(49, 7), 6);
        assert_eq!(row_cells(1, 7).collect::<Vec<_>>(), (8..=14).collect::<Vec<_>>());
    }

    #[test]
    fn test_markers_skip_special_cells() {
        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            let layout = BoardLayout::generate(7, 4, &mut rng);
            assert!(layout.marker_at(1).is_none());
            assert!(layout.marker_at(49).is_none());
            for cp in layout.checkpoints() {
                assert!(layout.marker_at(*cp).is_none());
            }
        }
    }

    #[test]
    fn test_every_row_has_both_kinds() {
        for seed in 0..50 {
            let mut rng = GameRng::new(seed);
            let layout = BoardLayout::generate(7, 4, &mut rng);
            for row in 0..7 {
                let kinds: Vec<MarkerKind> = row_cells(row, 7)
                    .filter_map(|cell| layout.marker_at(cell))
                    .collect();
                assert!(kinds.contains(&MarkerKind::Optional), "row {row} seed {seed}");
                assert!(kinds.contains(&MarkerKind::Forced), "row {row} seed {seed}");
            }
        }
    }

    #[test]
    fn test_single_eligible_cell_alternates() {
        // 2x2 board: row 0 has only cell 2, row 1 only cell 3.
        let mut rng = GameRng::new(1);
        let markers = generate_markers(2, &[], 4, &mut rng);
        assert_eq!(markers.get(&2), Some(&MarkerKind::Optional));
        assert_eq!(markers.get(&3), Some(&MarkerKind::Forced));
        assert_eq!(markers.len(), 2);
    }

    #[test]
    fn test_supplementary_markers_counted() {
        let mut rng = GameRng::new(3);
        let checkpoints = checkpoint_cells(7);
        let markers = generate_markers(7, &checkpoints, 4, &mut rng);
        // 44 eligible cells, 14 guaranteed, 30 left -> 7 extra.
        assert_eq!(markers.len(), 21);
    }

    #[test]
    fn test_crossed_checkpoint_direction() {
        let mut rng = GameRng::new(4);
        let layout = BoardLayout::generate(7, 4, &mut rng);
        assert_eq!(layout.crossed_checkpoint(10, 16, |_| false), Some(14));
        assert_eq!(layout.crossed_checkpoint(10, 14, |_| false), Some(14));
        assert_eq!(layout.crossed_checkpoint(14, 16, |_| false), None);
        assert_eq!(layout.crossed_checkpoint(10, 16, |c| c == 14), None);
        assert_eq!(layout.crossed_checkpoint(30, 12, |_| false), Some(28));
        assert_eq!(layout.crossed_checkpoint(5, 5, |_| false), None);
    }

    #[test]
    fn test_challenge_cells_include_checkpoints() {
        let mut rng = GameRng::new(5);
        let layout = BoardLayout::generate(7, 4, &mut rng);
        let cells = layout.challenge_cells();
        for cp in layout.checkpoints() {
            assert!(cells.contains(cp));
        }
        assert_eq!(cells.len(), layout.markers().len() + layout.checkpoints().len());
    }
}
