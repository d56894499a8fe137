use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use chrono::NaiveDate;
use tower::Service;

use crate::{
    domain::{CourtAvailability, DayAvailability, TimeslotWithStatus},
    ports::database::DatabasePort,
};

use super::{DomainLogic, Error};

pub struct DayAvailabilityRequest {
    pub date: NaiveDate,
}

impl<D, P> Service<DayAvailabilityRequest> for DomainLogic<D, P>
where
    D: DatabasePort + Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    type Response = DayAvailability;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: DayAvailabilityRequest) -> Self::Future {
        let database = self.database.clone();
        Box::pin(async move {
            let courts = database.list_active_courts().await?;
            // Timeslots are shared by every court
            let timeslots = database.list_active_timeslots().await?;

            let mut availability = Vec::with_capacity(courts.len());
            for court in courts {
                let booked = database.paid_timeslot_ids(court.id, req.date).await?;
                let timeslots = timeslots
                    .iter()
                    .map(|timeslot| TimeslotWithStatus {
                        is_booked: booked.contains(&timeslot.id),
                        timeslot: timeslot.clone(),
                    })
                    .collect();
                availability.push(CourtAvailability { court, timeslots });
            }

            Ok(DayAvailability {
                date: req.date,
                courts: availability,
            })
        })
    }
}
