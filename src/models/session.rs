use std::{collections::BTreeSet, time::Instant};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::PuzzleError,
    game::{found_words, PlacementEngine, Selection},
    models::{Grid, Position, Puzzle},
};

/// Result of toggling a single cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    pub position: Position,
    pub selected: bool,
    /// Words completed by this toggle
    pub newly_found: Vec<String>,
}

/// Client facing snapshot of a board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardView {
    pub board_id: Uuid,
    pub size: usize,
    pub grid: Grid,
    pub words: Vec<String>,
    pub found: Vec<String>,
    pub selected: Vec<Position>,
    pub solution_shown: bool,
    pub exported: bool,
    pub generation: u32,
    pub created_at: DateTime<Utc>,
}

/// One live board: the current puzzle plus what the player has done with it
#[derive(Debug)]
pub struct BoardSession {
    pub board_id: Uuid,
    pub words: Vec<String>,
    pub puzzle: Puzzle,
    pub selection: Selection,
    pub found: BTreeSet<String>,
    pub solution_shown: bool,
    pub exported: bool,
    /// Number of puzzles generated for this board so far
    pub generation: u32,
    pub created_at: DateTime<Utc>,
    pub last_active: Instant,
}

impl BoardSession {
    /// Generate the first puzzle for a set of words
    pub fn new<R: Rng + ?Sized>(
        words: Vec<String>,
        size: usize,
        engine: &PlacementEngine,
        rng: &mut R,
    ) -> Result<Self, PuzzleError> {
        let puzzle = engine.place(size, &words, rng)?;
        Ok(Self {
            board_id: Uuid::new_v4(),
            words: puzzle.words().iter().map(|w| w.to_string()).collect(),
            puzzle,
            selection: Selection::new(),
            found: BTreeSet::new(),
            solution_shown: false,
            exported: false,
            generation: 1,
            created_at: Utc::now(),
            last_active: Instant::now(),
        })
    }

    pub fn size(&self) -> usize {
        self.puzzle.size
    }

    pub fn view(&self) -> BoardView {
        let mut words = self.words.clone();
        words.sort();
        BoardView {
            board_id: self.board_id,
            size: self.size(),
            grid: self.puzzle.grid.clone(),
            words,
            found: self.found.iter().cloned().collect(),
            selected: self.selection.sorted(),
            solution_shown: self.solution_shown,
            exported: self.exported,
            generation: self.generation,
            created_at: self.created_at,
        }
    }

    /// Place the same words again; the previous puzzle is kept if placement fails
    pub fn reshuffle<R: Rng + ?Sized>(
        &mut self,
        engine: &PlacementEngine,
        rng: &mut R,
    ) -> Result<(), PuzzleError> {
        let puzzle = engine.place(self.size(), &self.words, rng)?;
        self.install(puzzle);
        Ok(())
    }

    /// Switch to a new set of words and generate a fresh puzzle for them
    pub fn replace_words<R: Rng + ?Sized>(
        &mut self,
        words: Vec<String>,
        engine: &PlacementEngine,
        rng: &mut R,
    ) -> Result<(), PuzzleError> {
        let puzzle = engine.place(self.size(), &words, rng)?;
        self.words = puzzle.words().iter().map(|w| w.to_string()).collect();
        self.install(puzzle);
        Ok(())
    }

    fn install(&mut self, puzzle: Puzzle) {
        self.puzzle = puzzle;
        self.selection.clear();
        self.found.clear();
        self.solution_shown = false;
        self.exported = false;
        self.generation += 1;
        self.touch();
    }

    /// Toggle a cell and report any words that became fully selected
    pub fn toggle_cell(&mut self, position: Position) -> Result<ToggleOutcome, PuzzleError> {
        if !self.puzzle.contains(position) {
            return Err(PuzzleError::CellOutOfBounds {
                row: position.row,
                col: position.col,
            });
        }
        if self.solution_shown {
            return Err(PuzzleError::SolutionShown);
        }
        if self.is_locked(position) {
            return Err(PuzzleError::CellLocked {
                row: position.row,
                col: position.col,
            });
        }

        self.touch();
        let selected = self.selection.toggle(position);
        let mut newly_found = Vec::new();
        if selected {
            for word in found_words(&self.puzzle, &self.selection) {
                if self.found.insert(word.to_string()) {
                    newly_found.push(word.to_string());
                }
            }
        }

        Ok(ToggleOutcome {
            position,
            selected,
            newly_found,
        })
    }

    /// Cells of found words can no longer be toggled
    pub fn is_locked(&self, position: Position) -> bool {
        self.found.iter().any(|word| {
            self.puzzle
                .placement(word)
                .is_some_and(|placement| placement.covers(position))
        })
    }

    /// Show or hide the solution, returning the new state.
    ///
    /// Hiding the solution starts the board over with nothing selected.
    pub fn toggle_solution(&mut self) -> bool {
        self.touch();
        if self.solution_shown {
            self.selection.clear();
            self.found.clear();
        }
        self.solution_shown = !self.solution_shown;
        self.solution_shown
    }

    /// Record an export of the current puzzle, one per shuffle
    pub fn mark_exported(&mut self) -> Result<(), PuzzleError> {
        if self.exported {
            return Err(PuzzleError::AlreadyExported);
        }
        self.exported = true;
        self.touch();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }
}
