use thiserror::Error;

/// Errors produced while building, playing or exporting a puzzle
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("need {needed} eligible words but only {available} are available")]
    InsufficientWords { needed: usize, available: usize },

    #[error("{word} is too long to fit in a {size} x {size} puzzle")]
    WordTooLong { word: String, size: usize },

    #[error("words must contain at least one character")]
    EmptyWord,

    #[error("a puzzle needs at least one word")]
    NoWords,

    #[error("invalid grid size {0}")]
    InvalidGridSize(usize),

    #[error("{word} could not be placed after {attempts} attempts")]
    PlacementFailed { word: String, attempts: usize },

    #[error("template has {lines} lines, at least {required} are required")]
    TemplateTooShort { lines: usize, required: usize },

    #[error("cell ({row}, {col}) is outside the grid")]
    CellOutOfBounds { row: usize, col: usize },

    #[error("cell ({row}, {col}) belongs to a word that was already found")]
    CellLocked { row: usize, col: usize },

    #[error("the solution is currently shown")]
    SolutionShown,

    #[error("this shuffle has already been exported")]
    AlreadyExported,
}

impl PuzzleError {
    /// True for errors caused by the requested words or grid rather than the server
    pub fn is_unprocessable(&self) -> bool {
        matches!(
            self,
            PuzzleError::InsufficientWords { .. }
                | PuzzleError::WordTooLong { .. }
                | PuzzleError::EmptyWord
                | PuzzleError::NoWords
                | PuzzleError::InvalidGridSize(_)
                | PuzzleError::PlacementFailed { .. }
        )
    }
}
