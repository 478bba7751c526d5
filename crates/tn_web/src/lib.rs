use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod errors;
pub mod handlers;
pub mod state;

pub use errors::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::root))
        .route("/news", get(handlers::list_news))
        .route("/news", post(handlers::create_news))
        .route("/news/:id", get(handlers::get_news))
        .route("/news/:id", delete(handlers::delete_news))
        .route("/ingest", post(handlers::run_ingest))
        .layer(cors)
        .with_state(Arc::new(state))
}
