use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use super::ApiError;
use crate::{
    commands::{update_payment_status::UpdatePaymentStatusRequest, DomainLogic},
    domain::PaymentStatus,
    ports::{database::DatabasePort, payment::PaymentPort},
};

/// Invoice callback sent by Xendit
///
/// Only `external_id` and `status` drive the update, the rest is kept for logging.
#[derive(Debug, Deserialize)]
pub struct XenditInvoiceCallback {
    #[serde(default)]
    id: String,
    external_id: String,
    status: PaymentStatus,
    #[serde(default)]
    paid_amount: Option<u64>,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    payment_channel: Option<String>,
    #[serde(default)]
    paid_at: Option<String>,
}

pub async fn xendit<D, P>(
    State(logic): State<DomainLogic<D, P>>,
    payload: Result<Json<XenditInvoiceCallback>, JsonRejection>,
) -> Result<Json<Value>, ApiError>
where
    D: DatabasePort + Send + Sync + 'static,
    P: PaymentPort + Send + Sync + 'static,
{
    let Json(payload) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    tracing::info!(
        invoice_id = %payload.id,
        external_id = %payload.external_id,
        status = %payload.status,
        paid_amount = ?payload.paid_amount,
        payment_method = ?payload.payment_method,
        payment_channel = ?payload.payment_channel,
        paid_at = ?payload.paid_at,
        "received Xendit callback"
    );

    let reservation_id = Uuid::parse_str(&payload.external_id)
        .map_err(|_| ApiError::bad_request("invalid external_id"))?;

    logic
        .oneshot(UpdatePaymentStatusRequest {
            reservation_id,
            status: payload.status,
        })
        .await?;

    Ok(Json(json!({ "message": "webhook received" })))
}
