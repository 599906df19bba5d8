use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>, frontend_dir: &str) -> Router {
    Router::new()
        .route("/api/health", get(handlers::healthcheck))
        // User routes
        .route("/api/users/register", post(handlers::auth::register))
        .route("/api/users/login", post(handlers::auth::login))
        .route("/api/users/me", get(handlers::auth::me))
        // Generation routes
        .route("/api/configs/validate", post(handlers::configs::validate))
        .route("/api/configs/suggest-cidr", get(handlers::configs::suggest_cidr))
        .route("/api/configs/generate", post(handlers::configs::generate))
        // History routes
        .route("/api/configs", post(handlers::configs::save_config))
        .route("/api/configs/history", get(handlers::configs::history))
        .route("/api/configs/deleted", get(handlers::configs::deleted))
        .route("/api/configs/:id", get(handlers::configs::get_config))
        .route("/api/configs/:id", delete(handlers::configs::delete_config))
        .route("/api/configs/:id/export", get(handlers::configs::export_config))
        .route("/api/configs/restore/:id", patch(handlers::configs::restore_config))
        // Static files (frontend)
        .nest_service("/assets", ServeDir::new(format!("{}/assets", frontend_dir)))
        .fallback_service(
            ServeDir::new(frontend_dir)
                .fallback(ServeFile::new(format!("{}/index.html", frontend_dir))),
        )
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
