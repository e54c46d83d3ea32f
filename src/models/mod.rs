pub mod puzzle;
pub mod session;

pub use puzzle::{
    format_word_list, Grid, Orientation, PlacedLetter, Position, Puzzle, WordPlacement,
};
pub use session::{BoardSession, BoardView, ToggleOutcome};
