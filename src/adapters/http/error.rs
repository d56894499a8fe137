use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{commands, ports::database};

/// Error body returned by every route: `{"error": "<message>"}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<commands::Error> for ApiError {
    fn from(err: commands::Error) -> Self {
        let status = match &err {
            commands::Error::InvalidInput(_)
            | commands::Error::SlotAlreadyReserved(_)
            | commands::Error::Invoice(_)
            | commands::Error::Database(
                database::Error::CourtNotFound(_) | database::Error::TimeslotNotFound(_),
            ) => StatusCode::BAD_REQUEST,
            commands::Error::Database(database::Error::ReservationNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            commands::Error::Database(_) => {
                tracing::error!(error = %err, "database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
