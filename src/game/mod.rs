// Puzzle engine modules

pub mod grid;
pub mod solution;
pub mod validator;

pub use grid::PlacementEngine;
pub use solution::{solution, SolutionGrid};
pub use validator::{found_words, Selection};
