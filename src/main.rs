//! Keyword Quiz - a timed keyword-guessing quiz session served over HTTP
//!
//! This is the main entry point for the keyword-quiz application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use keyword_quiz::{
    api::create_router,
    config::Config,
    services::{JsonFileSource, QuizDataSource},
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("keyword_quiz={},tower_http=info", config.log_level()))
        .init();

    info!("Starting keyword-quiz server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, quiz={}, timer={}s, tick={:?}",
        config.host,
        config.port,
        config.quiz.display(),
        config.timer,
        config.tick
    );

    let source: Arc<dyn QuizDataSource> = Arc::new(JsonFileSource::new(&config.quiz));
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        source,
        config.session_settings(),
    ));

    // Load the first question right away
    if let Err(e) = state.session.load().await {
        warn!("Initial quiz load rejected: {}", e);
    }

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /quiz/load   - Load a question");
    info!("  POST /quiz/timer  - Start the timer, or stop it and forfeit progress");
    info!("  POST /quiz/answer - Submit an answer");
    info!("  POST /quiz/reset  - Abandon the round and reload");
    info!("  GET  /quiz/status - Current session snapshot");
    info!("  GET  /quiz/events - Session event stream (SSE)");
    info!("  GET  /health      - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            match signal {
                Ok(_) => info!("Shutdown signal received"),
                Err(e) => error!("Failed to listen for shutdown signals: {}", e),
            }
        }
    }

    let final_state = state.session.snapshot();
    info!(
        "Server shutdown complete (session {}, {})",
        final_state.state, final_state.progress_text
    );
    Ok(())
}
