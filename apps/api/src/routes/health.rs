use axum::Json;
use serde_json::{json, Value};

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-matcher-api"
    }))
}

/// GET /
/// Service banner listing the available endpoints.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Resume Matcher API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "extract": "/extract-resume",
            "match": "/match-job",
            "analyze": "/analyze"
        }
    }))
}
