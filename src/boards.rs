//! Board operations shared by the HTTP routes and the WebSocket handler.

use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::PuzzleError,
    export::export_to_dir,
    game::{solution, SolutionGrid},
    models::{format_word_list, BoardSession, BoardView, Position, ToggleOutcome},
    AppState,
};

/// Words per line in the plain text rendering
pub const WORDS_PER_LINE: usize = 5;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("board {0} not found")]
    NotFound(Uuid),

    #[error("no word list is loaded, provide words explicitly")]
    NoWordList,

    #[error("grid size {size} must be between {min} and {max}")]
    GridSizeOutOfRange { size: usize, min: usize, max: usize },

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}

impl BoardError {
    pub fn status(&self) -> StatusCode {
        match self {
            BoardError::NotFound(_) => StatusCode::NOT_FOUND,
            BoardError::NoWordList => StatusCode::SERVICE_UNAVAILABLE,
            BoardError::GridSizeOutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BoardError::Puzzle(e) if e.is_unprocessable() => StatusCode::UNPROCESSABLE_ENTITY,
            BoardError::Puzzle(PuzzleError::CellOutOfBounds { .. }) => StatusCode::BAD_REQUEST,
            BoardError::Puzzle(
                PuzzleError::CellLocked { .. }
                | PuzzleError::SolutionShown
                | PuzzleError::AlreadyExported,
            ) => StatusCode::CONFLICT,
            BoardError::Puzzle(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Solution state after showing or hiding it
#[derive(Debug, Clone, serde::Serialize)]
pub struct SolutionState {
    pub shown: bool,
    pub cells: Option<SolutionGrid>,
}

impl AppState {
    /// Create a board from the given words, or from a random draw of the word list
    pub fn create_board(
        &self,
        words: Option<Vec<String>>,
        grid_size: Option<usize>,
    ) -> Result<BoardView, BoardError> {
        let size = grid_size.unwrap_or(self.config.puzzle.grid_size);
        if !self.config.grid_size_allowed(size) {
            return Err(BoardError::GridSizeOutOfRange {
                size,
                min: self.config.puzzle.min_grid_size,
                max: self.config.puzzle.max_grid_size,
            });
        }

        let mut rng = rand::rng();
        let words = match words {
            Some(words) => words,
            None => self.sample_words(size)?,
        };
        let board = BoardSession::new(words, size, &self.engine, &mut rng)?;
        let view = board.view();

        tracing::info!(
            "Created board {} ({}x{}, {} words)",
            board.board_id,
            size,
            size,
            board.words.len()
        );
        self.boards.insert(board.board_id, board);

        Ok(view)
    }

    fn sample_words(&self, size: usize) -> Result<Vec<String>, BoardError> {
        if self.word_list.is_empty() {
            return Err(BoardError::NoWordList);
        }
        let mut rng = rand::rng();
        Ok(self
            .word_list
            .sample(&mut rng, self.config.puzzle.word_count, size)?)
    }

    pub fn board_view(&self, board_id: Uuid) -> Result<BoardView, BoardError> {
        self.with_board(board_id, |board| Ok(board.view()))
    }

    pub fn remove_board(&self, board_id: Uuid) -> Result<(), BoardError> {
        if self.boards.remove(&board_id).is_none() {
            return Err(BoardError::NotFound(board_id));
        }
        tracing::info!("Removed board {}", board_id);
        Ok(())
    }

    /// Same words, new layout
    pub fn reshuffle(&self, board_id: Uuid) -> Result<BoardView, BoardError> {
        self.with_board(board_id, |board| {
            board.reshuffle(&self.engine, &mut rand::rng())?;
            tracing::debug!("Reshuffled board {} (generation {})", board_id, board.generation);
            Ok(board.view())
        })
    }

    /// Draw a fresh word set from the word list and lay it out
    pub fn new_words(&self, board_id: Uuid) -> Result<BoardView, BoardError> {
        let size = self.with_board(board_id, |board| Ok(board.size()))?;
        let words = self.sample_words(size)?;
        self.with_board(board_id, |board| {
            board.replace_words(words, &self.engine, &mut rand::rng())?;
            tracing::debug!("Board {} has new words: {:?}", board_id, board.words);
            Ok(board.view())
        })
    }

    pub fn toggle_cell(
        &self,
        board_id: Uuid,
        position: Position,
    ) -> Result<ToggleOutcome, BoardError> {
        self.with_board(board_id, |board| {
            let outcome = board.toggle_cell(position)?;
            for word in &outcome.newly_found {
                tracing::info!("Word {} found on board {}", word, board_id);
            }
            Ok(outcome)
        })
    }

    pub fn toggle_solution(&self, board_id: Uuid) -> Result<SolutionState, BoardError> {
        self.with_board(board_id, |board| {
            let shown = board.toggle_solution();
            Ok(SolutionState {
                shown,
                cells: shown.then(|| solution(&board.puzzle)),
            })
        })
    }

    pub fn solution(&self, board_id: Uuid) -> Result<SolutionGrid, BoardError> {
        self.with_board(board_id, |board| Ok(solution(&board.puzzle)))
    }

    /// Plain text rendering: the grid followed by the words to find
    pub fn board_text(&self, board_id: Uuid) -> Result<String, BoardError> {
        self.with_board(board_id, |board| {
            let mut words = board.words.clone();
            words.sort();
            Ok(format!(
                "{}\nWords to find are:\n{}\n",
                board.puzzle,
                format_word_list(&words, WORDS_PER_LINE)
            ))
        })
    }

    /// Write the current puzzle as an HTML page into the export directory
    pub async fn export_board(&self, board_id: Uuid) -> Result<PathBuf, BoardError> {
        let page = self.with_board(board_id, |board| {
            board.mark_exported()?;
            let mut words = board.words.clone();
            words.sort();
            Ok(self.template.render(&board.puzzle, &words))
        })?;

        match export_to_dir(Path::new(&self.config.export.output_dir), &page).await {
            Ok(path) => Ok(path),
            Err(e) => {
                // Allow another try after a failed write
                if let Some(mut board) = self.boards.get_mut(&board_id) {
                    board.exported = false;
                }
                Err(e.into())
            }
        }
    }

    /// Run `f` against a board while holding its map entry; never call across an await
    fn with_board<T>(
        &self,
        board_id: Uuid,
        f: impl FnOnce(&mut BoardSession) -> Result<T, BoardError>,
    ) -> Result<T, BoardError> {
        let mut board = self
            .boards
            .get_mut(&board_id)
            .ok_or(BoardError::NotFound(board_id))?;
        board.touch();
        f(board.value_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, dictionary::WordList, export::HtmlTemplate};

    const WORDS: &str = "otter\nbadger\nweasel\nmarten\nstoat\nmink\nferret\nsable\nwolverine\nskunk\nhare\nvole\n";

    fn state_with(word_list: WordList) -> AppState {
        let mut config = Config::defaults().unwrap();
        config.export.output_dir = std::env::temp_dir()
            .join(format!("boards-{}", Uuid::new_v4()))
            .to_string_lossy()
            .into_owned();
        AppState::new(config, word_list, HtmlTemplate::bundled())
    }

    fn words(list: &[&str]) -> Option<Vec<String>> {
        Some(list.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn test_create_board_with_explicit_words() {
        let state = state_with(WordList::empty());
        let view = state.create_board(words(&["otter", "mink"]), Some(8)).unwrap();
        assert_eq!(view.size, 8);
        assert_eq!(view.words, vec!["MINK", "OTTER"]);
        assert!(state.boards.contains_key(&view.board_id));
    }

    #[test]
    fn test_create_board_samples_word_list() {
        let state = state_with(WordList::from_text(WORDS));
        let view = state.create_board(None, None).unwrap();
        assert_eq!(view.size, 20);
        assert_eq!(view.words.len(), 10);
    }

    #[test]
    fn test_create_board_without_word_list() {
        let state = state_with(WordList::empty());
        let err = state.create_board(None, None).unwrap_err();
        assert!(matches!(err, BoardError::NoWordList));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_grid_size_limits() {
        let state = state_with(WordList::empty());
        let err = state.create_board(words(&["cat"]), Some(2)).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_unknown_board() {
        let state = state_with(WordList::empty());
        let err = state.reshuffle(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_new_words_replaces_word_set() {
        let state = state_with(WordList::from_text(WORDS));
        let view = state.create_board(words(&["zebra"]), Some(20)).unwrap();
        let updated = state.new_words(view.board_id).unwrap();
        assert_eq!(updated.words.len(), 10);
        assert!(!updated.words.contains(&"ZEBRA".to_string()));
        assert_eq!(updated.generation, 2);
    }

    #[test]
    fn test_toggle_solution_round_trip() {
        let state = state_with(WordList::empty());
        let view = state.create_board(words(&["otter"]), Some(8)).unwrap();

        let shown = state.toggle_solution(view.board_id).unwrap();
        assert!(shown.shown);
        let cells = shown.cells.unwrap();
        assert_eq!(cells.iter().flatten().filter(|c| c.is_some()).count(), 5);

        let err = state
            .toggle_cell(view.board_id, Position { row: 0, col: 0 })
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let hidden = state.toggle_solution(view.board_id).unwrap();
        assert!(!hidden.shown);
        assert!(hidden.cells.is_none());
    }

    #[test]
    fn test_board_text_lists_words() {
        let state = state_with(WordList::empty());
        let view = state.create_board(words(&["otter", "mink"]), Some(8)).unwrap();
        let text = state.board_text(view.board_id).unwrap();
        assert_eq!(text.lines().count(), 8 + 3);
        assert!(text.ends_with("Words to find are:\nMINK  OTTER\n"));
    }

    #[tokio::test]
    async fn test_export_once_per_shuffle() {
        let state = state_with(WordList::empty());
        let view = state.create_board(words(&["otter"]), Some(8)).unwrap();

        let path = state.export_board(view.board_id).await.unwrap();
        let page = std::fs::read_to_string(&path).unwrap();
        assert!(page.contains("<li>OTTER</li>"));
        assert!(page.contains("SIZE: 8x8"));

        let err = state.export_board(view.board_id).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        state.reshuffle(view.board_id).unwrap();
        let second = state.export_board(view.board_id).await.unwrap();
        assert_eq!(second.file_name().unwrap(), "WordSearch1.html");

        std::fs::remove_dir_all(&state.config.export.output_dir).unwrap();
    }

    #[test]
    fn test_remove_board() {
        let state = state_with(WordList::empty());
        let view = state.create_board(words(&["otter"]), Some(8)).unwrap();
        state.remove_board(view.board_id).unwrap();
        assert!(matches!(
            state.remove_board(view.board_id),
            Err(BoardError::NotFound(_))
        ));
    }
}
