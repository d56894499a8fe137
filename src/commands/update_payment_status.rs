use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower::Service;
use uuid::Uuid;

use crate::{
    domain::{BookingStatus, PaymentStatus},
    ports::database::DatabasePort,
};

use super::{DomainLogic, Error};

pub struct UpdatePaymentStatusRequest {
    pub reservation_id: Uuid,
    /// Status as reported by the payment provider
    pub status: PaymentStatus,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UpdatePaymentStatusResponse {
    pub reservation_id: Uuid,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
}

impl<D, P> Service<UpdatePaymentStatusRequest> for DomainLogic<D, P>
where
    D: DatabasePort + Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    type Response = UpdatePaymentStatusResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: UpdatePaymentStatusRequest) -> Self::Future {
        let database = self.database.clone();
        Box::pin(async move {
            let mut reservation = database.get_reservation(req.reservation_id).await?;
            reservation.apply_payment_status(req.status);
            database.update_reservation(reservation.clone()).await?;

            tracing::info!(
                reservation_id = %reservation.id,
                payment_status = %reservation.payment_status,
                status = ?reservation.status,
                "applied payment status"
            );

            Ok(UpdatePaymentStatusResponse {
                reservation_id: reservation.id,
                status: reservation.status,
                payment_status: reservation.payment_status,
            })
        })
    }
}
