pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{config::Settings, service::ServiceContext};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // Reservation resource
        .nest("/api/reservations", reservation_routes())

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::reservations::list))
        .route("/", post(handlers::reservations::create))
        .route("/valid", get(handlers::reservations::list_awaiting_passenger))
        .route("/seat/available", get(handlers::reservations::available_seats))
        .route("/:id", put(handlers::reservations::update))
        .route("/:id", delete(handlers::reservations::delete))
}
