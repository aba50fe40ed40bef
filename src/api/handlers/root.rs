use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Skybook API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Airline reservation booking service",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "reservations": "/api/reservations"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
