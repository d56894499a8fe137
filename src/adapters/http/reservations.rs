use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tower::ServiceExt;
use uuid::Uuid;

use super::ApiError;
use crate::{
    commands::{
        create_reservation::{CreateReservationRequest, CreateReservationResponse},
        day_availability::DayAvailabilityRequest,
        DomainLogic,
    },
    domain::{Customer, DayAvailability, Slot},
    ports::{database::DatabasePort, payment::PaymentPort},
};

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReservationBody {
    court_id: Uuid,
    timeslot_id: Uuid,
    date: String,
    customer: Customer,
}

fn parse_date(date: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request("invalid date format"))
}

pub async fn day_availability<D, P>(
    State(logic): State<DomainLogic<D, P>>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<DayAvailability>, ApiError>
where
    D: DatabasePort + Send + Sync + 'static,
    P: PaymentPort + Send + Sync + 'static,
{
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let date = query
        .date
        .filter(|date| !date.is_empty())
        .ok_or_else(|| ApiError::bad_request("date parameter is required"))?;
    let date = parse_date(&date)?;

    let availability = logic.oneshot(DayAvailabilityRequest { date }).await?;

    Ok(Json(availability))
}

pub async fn create<D, P>(
    State(logic): State<DomainLogic<D, P>>,
    body: Result<Json<CreateReservationBody>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateReservationResponse>), ApiError>
where
    D: DatabasePort + Send + Sync + 'static,
    P: PaymentPort + Send + Sync + 'static,
{
    let Json(body) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let date = parse_date(&body.date)?;

    let created = logic
        .oneshot(CreateReservationRequest {
            slot: Slot {
                court_id: body.court_id,
                timeslot_id: body.timeslot_id,
                date,
            },
            customer: body.customer,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}
