//! Single-page web front-end.
//!
//! Every action posts a form and gets the whole page back, re-rendered from
//! the caller's session state.

use crate::core::error::SitegenError;
use crate::gallery::Gallery;
use crate::providers::LLMProvider;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

mod handlers;
pub mod page;
pub mod session_store;

use session_store::SessionStore;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn LLMProvider>,
    /// `None` when no store is configured; gallery features are then hidden.
    pub gallery: Option<Gallery>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(provider: Arc<dyn LLMProvider>, gallery: Option<Gallery>) -> Self {
        Self {
            provider,
            gallery,
            sessions: SessionStore::new(SessionStore::DEFAULT_IDLE),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/generate", post(handlers::generate))
        .route("/code", post(handlers::toggle_code))
        .route("/submit", post(handlers::submit))
        .route("/gallery/:id", post(handlers::replay))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(state: AppState, bind: &str) -> Result<(), SitegenError> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Site generator listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
