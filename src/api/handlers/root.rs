use axum::{http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Gymkeeper API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Membership and payment tracking for a single gym",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "auth": "/auth/login",
            "api": "/api"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
