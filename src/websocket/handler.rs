use crate::{
    boards::{BoardError, SolutionState},
    models::{Position, ToggleOutcome},
    websocket::messages::{ClientMessage, ServerMessage},
    AppState, BoardSubscriber,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// WebSocket upgrade handler for a single board
pub async fn handle_websocket(
    Path(board_id): Path<Uuid>,
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    if !state.boards.contains_key(&board_id) {
        tracing::warn!("WebSocket requested for unknown board {}", board_id);
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, board_id)))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, board_id: Uuid) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);
    let connection_id = Uuid::new_v4();

    state.subscribers.insert(
        connection_id,
        BoardSubscriber {
            board_id,
            tx: tx.clone(),
        },
    );
    tracing::info!(
        "WebSocket connection {} established for board {}",
        connection_id,
        board_id
    );

    // Start the client off with the current board
    if let Ok(board) = state.board_view(board_id) {
        let _ = tx.send(ServerMessage::BoardState { board }).await;
    }

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    // Handle incoming messages from the client
    let state_for_recv = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        if let Err(e) =
                            handle_client_message(client_msg, &state_for_recv, &tx, board_id).await
                        {
                            tracing::debug!("Rejected message on board {}: {}", board_id, e);
                            let error_msg = ServerMessage::Error {
                                message: e.to_string(),
                            };
                            let _ = tx.send(error_msg).await;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse message: {}", e);
                        let error_msg = ServerMessage::Error {
                            message: format!("Invalid message format: {}", e),
                        };
                        let _ = tx.send(error_msg).await;
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Client {} disconnected from board {}", connection_id, board_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    state.subscribers.remove(&connection_id);
    // Idle time starts counting from the last disconnect
    if let Some(mut board) = state.boards.get_mut(&board_id) {
        board.touch();
    }

    tracing::info!(
        "WebSocket connection {} closed for board {}",
        connection_id,
        board_id
    );
}

/// Send a message to every connection watching a board
pub async fn broadcast_to_board(state: &AppState, board_id: Uuid, message: ServerMessage) {
    let senders: Vec<_> = state
        .subscribers
        .iter()
        .filter(|entry| entry.board_id == board_id)
        .map(|entry| entry.tx.clone())
        .collect();

    for tx in senders {
        let _ = tx.send(message.clone()).await;
    }
}

/// Messages describing a toggle, in the order clients should apply them
pub fn toggle_messages(outcome: &ToggleOutcome) -> Vec<ServerMessage> {
    let mut messages = vec![ServerMessage::CellToggled {
        row: outcome.position.row,
        col: outcome.position.col,
        selected: outcome.selected,
    }];
    messages.extend(
        outcome
            .newly_found
            .iter()
            .map(|word| ServerMessage::WordFound { word: word.clone() }),
    );
    messages
}

/// Tell a board's watchers the solution changed, resending the board once it is hidden
pub async fn broadcast_solution(
    state: &AppState,
    board_id: Uuid,
    solution: &SolutionState,
) -> Result<(), BoardError> {
    broadcast_to_board(
        state,
        board_id,
        ServerMessage::Solution {
            shown: solution.shown,
            cells: solution.cells.clone(),
        },
    )
    .await;
    if !solution.shown {
        // Hiding the solution cleared the selection
        let board = state.board_view(board_id)?;
        broadcast_to_board(state, board_id, ServerMessage::BoardState { board }).await;
    }
    Ok(())
}

/// Handle individual client messages
async fn handle_client_message(
    msg: ClientMessage,
    state: &AppState,
    tx: &mpsc::Sender<ServerMessage>,
    board_id: Uuid,
) -> Result<(), BoardError> {
    match msg {
        ClientMessage::ToggleCell { row, col } => {
            let outcome = state.toggle_cell(board_id, Position { row, col })?;
            for message in toggle_messages(&outcome) {
                broadcast_to_board(state, board_id, message).await;
            }
        }
        ClientMessage::Reshuffle => {
            let board = state.reshuffle(board_id)?;
            broadcast_to_board(state, board_id, ServerMessage::BoardState { board }).await;
        }
        ClientMessage::NewWords => {
            let board = state.new_words(board_id)?;
            broadcast_to_board(state, board_id, ServerMessage::BoardState { board }).await;
        }
        ClientMessage::ToggleSolution => {
            let solution = state.toggle_solution(board_id)?;
            broadcast_solution(state, board_id, &solution).await?;
        }
        ClientMessage::Sync => {
            let board = state.board_view(board_id)?;
            let _ = tx.send(ServerMessage::BoardState { board }).await;
        }
    }

    Ok(())
}
