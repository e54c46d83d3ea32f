use std::collections::HashSet;

use rand::{seq::IndexedRandom, Rng};

use crate::{
    error::PuzzleError,
    models::{Orientation, PlacedLetter, Puzzle, WordPlacement},
    utils::letters::{normalize_word, random_letter},
};

/// Attempts allowed per word before placement gives up
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Places words into a square grid with random retry on collision
#[derive(Debug, Clone, Copy)]
pub struct PlacementEngine {
    max_attempts: usize,
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl PlacementEngine {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Build a puzzle of `grid_size` x `grid_size` containing every word.
    ///
    /// Words are trimmed, upper-cased and de-duplicated (first occurrence wins)
    /// and then placed in input order. Each word gets at most `max_attempts`
    /// random start/orientation picks; a pick is rejected when the word runs off
    /// the grid or crosses a cell holding a different letter. Crossing a cell
    /// that already holds the same letter is allowed. Cells left empty after all
    /// words are placed get a uniformly random letter.
    pub fn place<R: Rng + ?Sized>(
        &self,
        grid_size: usize,
        words: &[String],
        rng: &mut R,
    ) -> Result<Puzzle, PuzzleError> {
        if grid_size == 0 {
            return Err(PuzzleError::InvalidGridSize(grid_size));
        }

        let words = prepare_words(words, grid_size)?;
        let mut cells: Vec<Vec<Option<char>>> = vec![vec![None; grid_size]; grid_size];
        let mut placements = Vec::with_capacity(words.len());

        for word in words {
            let placement = self.place_word(&mut cells, &word, rng)?;
            tracing::trace!(
                "Placed {} {:?} starting at ({}, {})",
                word,
                placement.orientation,
                placement.letters[0].row,
                placement.letters[0].col
            );
            placements.push(placement);
        }

        let grid = cells
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.unwrap_or_else(|| random_letter(rng)))
                    .collect()
            })
            .collect();

        Ok(Puzzle {
            size: grid_size,
            grid,
            placements,
        })
    }

    fn place_word<R: Rng + ?Sized>(
        &self,
        cells: &mut [Vec<Option<char>>],
        word: &str,
        rng: &mut R,
    ) -> Result<WordPlacement, PuzzleError> {
        let size = cells.len();
        let letters: Vec<char> = word.chars().collect();

        for _ in 0..self.max_attempts {
            let orientation = *Orientation::ALL
                .choose(rng)
                .unwrap_or(&Orientation::Right);
            let start_row = rng.random_range(0..size);
            let start_col = rng.random_range(0..size);

            let Some(path) = path_cells(size, start_row, start_col, orientation, letters.len())
            else {
                continue;
            };

            // Crossing an identical letter is a legal overlap
            let conflict = path.iter().zip(&letters).any(|(&(row, col), &letter)| {
                matches!(cells[row][col], Some(existing) if existing != letter)
            });
            if conflict {
                continue;
            }

            let placed = path
                .iter()
                .zip(&letters)
                .map(|(&(row, col), &letter)| {
                    cells[row][col] = Some(letter);
                    PlacedLetter { letter, row, col }
                })
                .collect();

            return Ok(WordPlacement {
                word: word.to_string(),
                orientation,
                letters: placed,
            });
        }

        tracing::warn!(
            "Giving up on {} after {} attempts in a {}x{} grid",
            word,
            self.max_attempts,
            size,
            size
        );
        Err(PuzzleError::PlacementFailed {
            word: word.to_string(),
            attempts: self.max_attempts,
        })
    }
}

/// Normalise, de-duplicate and length-check the input words
fn prepare_words(words: &[String], grid_size: usize) -> Result<Vec<String>, PuzzleError> {
    if words.is_empty() {
        return Err(PuzzleError::NoWords);
    }
    let mut prepared: Vec<String> = Vec::with_capacity(words.len());
    let mut seen: HashSet<String> = HashSet::with_capacity(words.len());
    for word in words {
        let word = normalize_word(word);
        if word.is_empty() {
            return Err(PuzzleError::EmptyWord);
        }
        if word.chars().count() > grid_size {
            return Err(PuzzleError::WordTooLong {
                word,
                size: grid_size,
            });
        }
        if seen.insert(word.clone()) {
            prepared.push(word);
        }
    }
    Ok(prepared)
}

/// Cells a word of `len` letters covers from the given start, or None if it leaves the grid
fn path_cells(
    size: usize,
    row: usize,
    col: usize,
    orientation: Orientation,
    len: usize,
) -> Option<Vec<(usize, usize)>> {
    let (row_step, col_step) = orientation.step();
    let span = len.checked_sub(1)? as isize;
    let end_row = row as isize + span * row_step;
    let end_col = col as isize + span * col_step;
    let bounds = 0..size as isize;
    if !bounds.contains(&end_row) || !bounds.contains(&end_col) {
        return None;
    }

    Some(
        (0..len as isize)
            .map(|i| {
                (
                    (row as isize + i * row_step) as usize,
                    (col as isize + i * col_step) as usize,
                )
            })
            .collect(),
    )
}
