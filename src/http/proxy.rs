//! `POST /api/proxy`: forward a described request.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::forward::{NormalizedError, OutgoingRequestDescription};
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;

/// Decode the description, forward it, and answer with the normalized
/// outcome. Undecodable bodies are answered like a missing URL: 400;
/// bodies over the configured limit get 413.
pub async fn forward_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<OutgoingRequestDescription>, JsonRejection>,
) -> Response {
    let request_id = headers.request_id();

    let description = match payload {
        Ok(Json(description)) => description,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(request_id = %request_id, "Proxy payload too large");
            return rejection.into_response();
        }
        Err(rejection) => {
            tracing::warn!(request_id = %request_id, error = %rejection, "Rejected proxy payload");
            return NormalizedError::validation(rejection.body_text()).into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %description.method_name(),
        url = description.url.as_deref().unwrap_or_default(),
        "Proxying request"
    );

    match state.forwarder.forward(&description).await {
        Ok(response) => response.into_response(),
        Err(err) => err.into_response(),
    }
}
