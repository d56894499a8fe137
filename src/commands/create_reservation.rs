use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use serde::Serialize;
use tower::Service;

use crate::{
    domain::{Customer, NewReservation, Reservation, Slot},
    ports::{
        database::DatabasePort,
        payment::{InvoiceItem, InvoiceMetadata, InvoiceRequest, PaymentPort},
    },
};

use super::{DomainLogic, Error};

/// Invoices can be paid for 24 hours
const INVOICE_DURATION_SECS: u32 = 86_400;
const INVOICE_ITEM_CATEGORY: &str = "Sports";

pub struct CreateReservationRequest {
    pub slot: Slot,
    pub customer: Customer,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct CreateReservationResponse {
    /// The reservation with its court and timeslot populated
    pub reservation: Reservation,
    /// Where the customer pays
    pub invoice_url: String,
}

impl<D, P> Service<CreateReservationRequest> for DomainLogic<D, P>
where
    D: DatabasePort + Send + Sync + 'static,
    P: PaymentPort + Send + Sync + 'static,
{
    type Response = CreateReservationResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: CreateReservationRequest) -> Self::Future {
        let database = self.database.clone();
        let payment = self.payment.clone();
        let total_price = self.pricing.price(&req.slot);
        Box::pin(async move {
            if let Some(field) = req.customer.missing_field() {
                return Err(Error::InvalidInput(
                    format!("customer {field} is required").into(),
                ));
            }

            // The check and the insert below are not atomic: two concurrent requests for the
            // same slot can both get through.
            if database.paid_reservation_exists(req.slot).await? {
                return Err(Error::SlotAlreadyReserved(req.slot));
            }

            let mut reservation = database
                .insert_reservation(NewReservation {
                    slot: req.slot,
                    total_price,
                })
                .await?;

            let invoice = match payment
                .create_invoice(invoice_request(&reservation, req.customer))
                .await
            {
                Ok(invoice) => invoice,
                Err(err) => {
                    // Best-effort removal of the provisional reservation
                    if let Err(delete_err) = database.delete_reservation(reservation.id).await {
                        tracing::warn!(
                            reservation_id = %reservation.id,
                            error = %delete_err,
                            "failed to remove reservation after invoice failure"
                        );
                    }
                    return Err(Error::Invoice(err));
                }
            };

            reservation.attach_invoice(&invoice);
            database.update_reservation(reservation.clone()).await?;
            let reservation = database.get_reservation(reservation.id).await?;

            tracing::info!(
                reservation_id = %reservation.id,
                slot = %reservation.slot(),
                invoice_id = %invoice.id,
                "created reservation"
            );

            Ok(CreateReservationResponse {
                reservation,
                invoice_url: invoice.invoice_url,
            })
        })
    }
}

fn invoice_request(reservation: &Reservation, customer: Customer) -> InvoiceRequest {
    let court_name = reservation
        .court
        .as_ref()
        .map(|court| court.name.as_str())
        .unwrap_or_default();
    let (start_time, end_time) = reservation
        .timeslot
        .as_ref()
        .map(|timeslot| (timeslot.start_time.as_str(), timeslot.end_time.as_str()))
        .unwrap_or_default();
    let date = reservation.date.format("%Y-%m-%d");

    InvoiceRequest {
        external_id: reservation.id.to_string(),
        amount: reservation.total_price,
        description: format!("Reservation for {court_name} at {date}"),
        invoice_duration_secs: INVOICE_DURATION_SECS,
        customer,
        items: vec![InvoiceItem {
            name: format!("Court {court_name} - {start_time} to {end_time}"),
            quantity: 1,
            price: reservation.total_price,
            category: INVOICE_ITEM_CATEGORY.to_string(),
        }],
        metadata: InvoiceMetadata {
            reservation_id: reservation.id,
            court_id: reservation.court_id,
            date: reservation.date,
        },
    }
}
