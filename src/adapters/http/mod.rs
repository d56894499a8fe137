//! HTTP routes
//!
//! - `GET  /health`
//! - `GET  /api/v1/reservations/availability?date=YYYY-MM-DD`
//! - `POST /api/v1/reservations`
//! - `POST /api/v1/webhooks/xendit`

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{
    commands::DomainLogic,
    ports::{database::DatabasePort, payment::PaymentPort},
};

mod error;
mod reservations;
mod webhooks;

pub use error::ApiError;

pub fn router<D, P>(logic: DomainLogic<D, P>) -> Router
where
    D: DatabasePort + Send + Sync + 'static,
    P: PaymentPort + Send + Sync + 'static,
{
    let api = Router::new()
        .route(
            "/reservations/availability",
            get(reservations::day_availability::<D, P>),
        )
        .route("/reservations", post(reservations::create::<D, P>))
        .route("/webhooks/xendit", post(webhooks::xendit::<D, P>));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .with_state(logic)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use crate::ports::payment::MockPaymentPort;
    use axum::http::StatusCode;
    use serde_json::json;
    use speculoos::prelude::*;

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new();

        let (status, body) = send(app.router(MockPaymentPort::new()), get("/health")).await;

        assert_that!(status).is_equal_to(StatusCode::OK);
        assert_that!(body).is_equal_to(json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = TestApp::new();

        let (status, _) = send(app.router(MockPaymentPort::new()), get("/api/v1/courts")).await;

        assert_that!(status).is_equal_to(StatusCode::NOT_FOUND);
    }
}
