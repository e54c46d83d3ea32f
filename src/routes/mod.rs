pub mod boards;
pub mod health;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/boards", post(boards::create_board))
        .route(
            "/boards/{board_id}",
            get(boards::get_board).delete(boards::delete_board),
        )
        .route("/boards/{board_id}/reshuffle", post(boards::reshuffle))
        .route("/boards/{board_id}/new-words", post(boards::new_words))
        .route("/boards/{board_id}/toggle", post(boards::toggle_cell))
        .route(
            "/boards/{board_id}/solution",
            get(boards::get_solution).post(boards::toggle_solution),
        )
        .route("/boards/{board_id}/export", post(boards::export_board))
        .route("/boards/{board_id}/text", get(boards::board_text))
}
