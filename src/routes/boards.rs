use crate::{
    boards::{BoardError, SolutionState},
    game::SolutionGrid,
    models::{BoardView, Position, ToggleOutcome},
    websocket::{broadcast_solution, broadcast_to_board, messages::ServerMessage, toggle_messages},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct CreateBoardRequest {
    /// Words to hide; drawn from the word list when absent
    pub words: Option<Vec<String>>,
    pub grid_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResponse {
    pub path: String,
}

/// Log a rejected board operation and turn it into a status code
fn reject(action: &str, board_id: Option<Uuid>, e: BoardError) -> StatusCode {
    let status = e.status();
    if status.is_server_error() {
        tracing::error!("Failed to {} (board {:?}): {}", action, board_id, e);
    } else {
        tracing::warn!("Could not {} (board {:?}): {}", action, board_id, e);
    }
    status
}

/// Create a new board
pub async fn create_board(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBoardRequest>,
) -> Result<(StatusCode, Json<BoardView>), StatusCode> {
    let view = state
        .create_board(payload.words, payload.grid_size)
        .map_err(|e| reject("create board", None, e))?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_board(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<BoardView>, StatusCode> {
    state
        .board_view(board_id)
        .map(Json)
        .map_err(|e| reject("get board", Some(board_id), e))
}

pub async fn delete_board(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    state
        .remove_board(board_id)
        .map_err(|e| reject("delete board", Some(board_id), e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lay out the same words again
pub async fn reshuffle(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<BoardView>, StatusCode> {
    let view = state
        .reshuffle(board_id)
        .map_err(|e| reject("reshuffle", Some(board_id), e))?;
    broadcast_to_board(
        &state,
        board_id,
        ServerMessage::BoardState {
            board: view.clone(),
        },
    )
    .await;
    Ok(Json(view))
}

/// Replace the words with a fresh draw from the word list
pub async fn new_words(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<BoardView>, StatusCode> {
    let view = state
        .new_words(board_id)
        .map_err(|e| reject("draw new words", Some(board_id), e))?;
    broadcast_to_board(
        &state,
        board_id,
        ServerMessage::BoardState {
            board: view.clone(),
        },
    )
    .await;
    Ok(Json(view))
}

pub async fn toggle_cell(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<Uuid>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleOutcome>, StatusCode> {
    let position = Position {
        row: payload.row,
        col: payload.col,
    };
    let outcome = state
        .toggle_cell(board_id, position)
        .map_err(|e| reject("toggle cell", Some(board_id), e))?;
    for message in toggle_messages(&outcome) {
        broadcast_to_board(&state, board_id, message).await;
    }
    Ok(Json(outcome))
}

/// Show or hide the solution
pub async fn toggle_solution(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<SolutionState>, StatusCode> {
    let solution = state
        .toggle_solution(board_id)
        .map_err(|e| reject("toggle solution", Some(board_id), e))?;
    broadcast_solution(&state, board_id, &solution)
        .await
        .map_err(|e| reject("toggle solution", Some(board_id), e))?;
    Ok(Json(solution))
}

pub async fn get_solution(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<SolutionGrid>, StatusCode> {
    state
        .solution(board_id)
        .map(Json)
        .map_err(|e| reject("get solution", Some(board_id), e))
}

/// Write the board as an HTML page
pub async fn export_board(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<ExportResponse>, StatusCode> {
    let path = state
        .export_board(board_id)
        .await
        .map_err(|e| reject("export board", Some(board_id), e))?;
    Ok(Json(ExportResponse {
        path: path.to_string_lossy().into_owned(),
    }))
}

/// Plain text version of the board
pub async fn board_text(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<Uuid>,
) -> Result<String, StatusCode> {
    state
        .board_text(board_id)
        .map_err(|e| reject("render board", Some(board_id), e))
}
