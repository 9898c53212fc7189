pub mod auth;
pub mod common;
pub mod warehouses;

use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe used by the dashboard.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "success": true, "message": "Server is running" }))
}
