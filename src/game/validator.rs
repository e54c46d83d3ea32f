use crate::models::{Position, Puzzle, WordPlacement};
use std::collections::HashSet;

/// Cells the player has toggled on
#[derive(Debug, Clone, Default)]
pub struct Selection {
    cells: HashSet<Position>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a cell, returning whether it is now selected
    pub fn toggle(&mut self, pos: Position) -> bool {
        if self.cells.remove(&pos) {
            false
        } else {
            self.cells.insert(pos);
            true
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Selected cells in row-major order
    pub fn sorted(&self) -> Vec<Position> {
        let mut cells: Vec<_> = self.cells.iter().copied().collect();
        cells.sort();
        cells
    }

    /// True when every cell of the placement is selected
    pub fn covers(&self, placement: &WordPlacement) -> bool {
        placement.positions().all(|pos| self.cells.contains(&pos))
    }
}

/// Words whose whole placement is contained in the selection
pub fn found_words<'a>(puzzle: &'a Puzzle, selection: &Selection) -> Vec<&'a str> {
    puzzle
        .placements
        .iter()
        .filter(|placement| selection.covers(placement))
        .map(|placement| placement.word.as_str())
        .collect()
}
