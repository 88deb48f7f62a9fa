//! Collection endpoints served by the forwarder itself.
//!
//! Collections are persisted by a separate service; these placeholders keep
//! clients that talk only to the forwarder working.

use axum::Json;
use serde_json::{json, Value};

/// `GET /api/collections`
pub async fn list_collections() -> Json<Vec<Value>> {
    Json(Vec::new())
}

/// `POST /api/collections`
pub async fn create_collection() -> Json<Value> {
    Json(json!({ "success": true }))
}
