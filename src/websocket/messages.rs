use serde::{Deserialize, Serialize};

use crate::{game::SolutionGrid, models::BoardView};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    ToggleCell { row: usize, col: usize },
    Reshuffle,
    NewWords,
    ToggleSolution,
    /// Ask for the full board state again
    Sync,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    BoardState {
        board: BoardView,
    },
    CellToggled {
        row: usize,
        col: usize,
        selected: bool,
    },
    WordFound {
        word: String,
    },
    Solution {
        shown: bool,
        cells: Option<SolutionGrid>,
    },
    Error {
        message: String,
    },
}
