pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use roster_core::Roster;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use auth::BotAuth;
pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(state: AppState, auth: BotAuth) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/messages", post(routes::messages::post_message))
        .route("/api/records", get(routes::records::list_records))
        .route("/api/pending", get(routes::pending::list_pending))
        .layer(middleware::from_fn_with_state(
            Arc::new(auth),
            auth::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the chat webhook on `addr`.
pub async fn serve(
    roster: Arc<Roster>,
    auth: BotAuth,
    bot_id: Option<String>,
    addr: &str,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_on(roster, auth, bot_id, listener).await
}

/// Start the chat webhook on a pre-bound listener.
///
/// Lets the caller read the actual port first (useful with port 0).
pub async fn serve_on(
    roster: Arc<Roster>,
    auth: BotAuth,
    bot_id: Option<String>,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let app = build_router(AppState::new(roster, bot_id), auth);

    tracing::info!("roster webhook listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("roster webhook stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}
