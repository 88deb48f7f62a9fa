//! Response shaping.
//!
//! # Responsibilities
//! - Turn forward outcomes into JSON envelopes
//! - Mirror the target's status code on the inbound response
//!
//! # Design Decisions
//! - Timeouts answer 408, transport failures 500, validation 400
//! - A status the HTTP stack cannot represent degrades to 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::forward::{NormalizedError, NormalizedResponse};

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for NormalizedResponse {
    fn into_response(self) -> Response {
        (status_code(self.status), Json(self)).into_response()
    }
}

impl IntoResponse for NormalizedError {
    fn into_response(self) -> Response {
        (status_code(self.status), Json(self)).into_response()
    }
}
