use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Court, NewReservation, Reservation, Slot, Timeslot};

#[mockall::automock]
#[async_trait::async_trait]
pub trait DatabasePort {
    async fn list_active_courts(&self) -> Result<Vec<Court>, Error>;
    async fn list_active_timeslots(&self) -> Result<Vec<Timeslot>, Error>;

    /// Identifiers of the timeslots holding a `paid` reservation on that court and date
    async fn paid_timeslot_ids(
        &self,
        court_id: Uuid,
        date: NaiveDate,
    ) -> Result<HashSet<Uuid>, Error>;
    async fn paid_reservation_exists(&self, slot: Slot) -> Result<bool, Error>;

    /// Insert a `pending` reservation with a `PENDING` payment status
    async fn insert_reservation(&self, reservation: NewReservation) -> Result<Reservation, Error>;
    /// Load a reservation with its court and timeslot populated
    async fn get_reservation(&self, reservation_id: Uuid) -> Result<Reservation, Error>;
    async fn update_reservation(&self, reservation: Reservation) -> Result<(), Error>;
    async fn delete_reservation(&self, reservation_id: Uuid) -> Result<(), Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reservation {0} does not exist")]
    ReservationNotFound(Uuid),

    /// The reservation references a court that is not in the store
    #[error("court {0} does not exist")]
    CourtNotFound(Uuid),

    /// The reservation references a timeslot that is not in the store
    #[error("timeslot {0} does not exist")]
    TimeslotNotFound(Uuid),

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
