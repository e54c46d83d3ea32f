mod boards;
mod config;
mod dictionary;
mod error;
mod export;
mod game;
mod models;
mod routes;
mod utils;
mod websocket;

use std::{
    path::Path,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use axum::{routing::get, Router};
use dashmap::DashMap;
use tokio::sync::mpsc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::{
    config::Config,
    dictionary::WordList,
    export::HtmlTemplate,
    game::PlacementEngine,
    models::BoardSession,
    websocket::messages::ServerMessage,
};

/// How often the cleanup task scans for idle boards
pub const BOARD_CLEANUP_INTERVAL: Duration = Duration::from_secs(30);

/// A WebSocket connection watching one board
#[derive(Debug, Clone)]
pub struct BoardSubscriber {
    pub board_id: Uuid,
    pub tx: mpsc::Sender<ServerMessage>,
}

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub engine: PlacementEngine,
    pub word_list: WordList,
    pub template: HtmlTemplate,
    /// Live boards keyed by board id
    pub boards: DashMap<Uuid, BoardSession>,
    /// Open WebSocket connections keyed by connection id
    pub subscribers: DashMap<Uuid, BoardSubscriber>,
}

impl AppState {
    pub fn new(config: Config, word_list: WordList, template: HtmlTemplate) -> Self {
        Self {
            engine: PlacementEngine::new(config.puzzle.max_attempts),
            config,
            word_list,
            template,
            boards: DashMap::new(),
            subscribers: DashMap::new(),
        }
    }

    /// Number of open connections watching a board
    pub fn subscriber_count(&self, board_id: Uuid) -> usize {
        self.subscribers
            .iter()
            .filter(|s| s.board_id == board_id)
            .count()
    }

    /// Boards idle for longer than `grace` that nobody is watching
    pub fn stale_boards(&self, now: Instant, grace: Duration) -> Vec<Uuid> {
        self.boards
            .iter()
            .filter(|board| now.saturating_duration_since(board.last_active) > grace)
            .map(|board| *board.key())
            .filter(|board_id| self.subscriber_count(*board_id) == 0)
            .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "word_search_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting word search server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Load word list
    let word_list = match WordList::load(&config.puzzle.word_list_path).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(
                "Failed to load word list: {}. New boards will need explicit words.",
                e
            );
            tracing::warn!(
                "Put one word per line in {} to enable random word sets",
                config.puzzle.word_list_path
            );
            WordList::empty()
        }
    };

    // Load export template
    let template = match HtmlTemplate::load(Path::new(&config.export.template_path)).await {
        Ok(template) => template,
        Err(e) => {
            tracing::warn!("Failed to load export template: {}. Using bundled template.", e);
            HtmlTemplate::bundled()
        }
    };

    let state = Arc::new(AppState::new(config.clone(), word_list, template));
    tracing::info!(
        "Boards default to {}x{} with up to {} placement attempts per word",
        config.puzzle.grid_size,
        config.puzzle.grid_size,
        state.engine.max_attempts()
    );

    // Spawn background task to remove idle boards
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        board_cleanup_task(cleanup_state).await;
    });

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Serve exported puzzles
    let exports_service = ServeDir::new(&config.export.output_dir);

    // Build router
    let app = Router::new()
        // WebSocket endpoint
        .route("/ws/{board_id}", get(websocket::handle_websocket))
        // API routes
        .merge(routes::create_routes())
        .nest_service("/exports", exports_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws/{{board_id}}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Background task that periodically removes boards nobody has used for a while
async fn board_cleanup_task(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(BOARD_CLEANUP_INTERVAL);
    let grace = state.config.idle_grace_period();

    loop {
        interval.tick().await;

        for board_id in state.stale_boards(Instant::now(), grace) {
            if state.boards.remove(&board_id).is_some() {
                tracing::info!("Removed idle board {} (grace period expired)", board_id);
            }
        }
    }
}
