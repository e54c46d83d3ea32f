use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// The four directions a word may be written along
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Right,
    Down,
    DiagonalDown,
    DiagonalUp,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Right,
        Orientation::Down,
        Orientation::DiagonalDown,
        Orientation::DiagonalUp,
    ];

    /// Row and column increments for one step along this orientation
    pub fn step(self) -> (isize, isize) {
        match self {
            Orientation::Right => (0, 1),
            Orientation::Down => (1, 0),
            Orientation::DiagonalDown => (1, 1),
            Orientation::DiagonalUp => (-1, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PlacedLetter {
    pub letter: char,
    pub row: usize,
    pub col: usize,
}

impl PlacedLetter {
    pub fn position(&self) -> Position {
        Position {
            row: self.row,
            col: self.col,
        }
    }
}

/// Where one word landed, letters stored in word order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordPlacement {
    pub word: String,
    pub orientation: Orientation,
    pub letters: Vec<PlacedLetter>,
}

impl WordPlacement {
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.letters.iter().map(PlacedLetter::position)
    }

    pub fn covers(&self, pos: Position) -> bool {
        self.positions().any(|p| p == pos)
    }
}

pub type Grid = Vec<Vec<char>>;

/// A filled grid together with the placement of every word
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Puzzle {
    pub size: usize,
    pub grid: Grid,
    pub placements: Vec<WordPlacement>,
}

impl Puzzle {
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn words(&self) -> Vec<&str> {
        self.placements.iter().map(|p| p.word.as_str()).collect()
    }

    pub fn placement(&self, word: &str) -> Option<&WordPlacement> {
        self.placements.iter().find(|p| p.word == word)
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            let line: Vec<String> = row.iter().map(char::to_string).collect();
            writeln!(f, "{}", line.join("\t"))?;
        }
        Ok(())
    }
}

/// Lay words out `per_line` to a line, separated by two spaces
pub fn format_word_list(words: &[String], per_line: usize) -> String {
    words
        .chunks(per_line.max(1))
        .map(|chunk| chunk.join("  "))
        .collect::<Vec<_>>()
        .join("\n")
}
