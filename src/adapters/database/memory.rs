use super::seed::CatalogStore;
use crate::{
    domain::{BookingStatus, Court, NewReservation, PaymentStatus, Reservation, Slot, Timeslot},
    ports::database::{DatabasePort, Error},
};
use chrono::{NaiveDate, Utc};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};
use uuid::Uuid;

/// Rows kept in insertion order, like a table scanned by primary key
#[derive(Debug, Default)]
struct Tables {
    courts: Vec<Court>,
    timeslots: Vec<Timeslot>,
    reservations: Vec<Reservation>,
}

impl Tables {
    fn court(&self, court_id: Uuid) -> Option<&Court> {
        self.courts.iter().find(|court| court.id == court_id)
    }

    fn timeslot(&self, timeslot_id: Uuid) -> Option<&Timeslot> {
        self.timeslots
            .iter()
            .find(|timeslot| timeslot.id == timeslot_id)
    }

    fn paid_reservations(&self) -> impl Iterator<Item = &Reservation> {
        self.reservations
            .iter()
            .filter(|reservation| reservation.status == BookingStatus::Paid)
    }

    /// Copy of the reservation with its court and timeslot attached
    fn with_relations(&self, reservation: &Reservation) -> Reservation {
        Reservation {
            court: self.court(reservation.court_id).cloned(),
            timeslot: self.timeslot(reservation.timeslot_id).cloned(),
            ..reservation.clone()
        }
    }
}

#[derive(Clone, Debug)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDatabase {
    pub fn insert_court(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        is_active: bool,
    ) -> Result<Court, Error> {
        let now = Utc::now();
        let court = Court {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            is_active,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock()?.courts.push(court.clone());

        Ok(court)
    }

    pub fn insert_timeslot(
        &self,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        is_active: bool,
    ) -> Result<Timeslot, Error> {
        let now = Utc::now();
        let timeslot = Timeslot {
            id: Uuid::new_v4(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            is_active,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock()?.timeslots.push(timeslot.clone());

        Ok(timeslot)
    }

    /// All stored reservations, without relations
    pub fn reservations(&self) -> Result<Vec<Reservation>, Error> {
        Ok(self.tables.lock()?.reservations.clone())
    }
}

#[async_trait::async_trait]
impl DatabasePort for MemoryDatabase {
    async fn list_active_courts(&self) -> Result<Vec<Court>, Error> {
        let courts = self
            .tables
            .lock()?
            .courts
            .iter()
            .filter(|court| court.is_active)
            .cloned()
            .collect();

        Ok(courts)
    }

    async fn list_active_timeslots(&self) -> Result<Vec<Timeslot>, Error> {
        let timeslots = self
            .tables
            .lock()?
            .timeslots
            .iter()
            .filter(|timeslot| timeslot.is_active)
            .cloned()
            .collect();

        Ok(timeslots)
    }

    async fn paid_timeslot_ids(
        &self,
        court_id: Uuid,
        date: NaiveDate,
    ) -> Result<HashSet<Uuid>, Error> {
        let ids = self
            .tables
            .lock()?
            .paid_reservations()
            .filter(|reservation| reservation.court_id == court_id && reservation.date == date)
            .map(|reservation| reservation.timeslot_id)
            .collect();

        Ok(ids)
    }

    async fn paid_reservation_exists(&self, slot: Slot) -> Result<bool, Error> {
        let exists = self
            .tables
            .lock()?
            .paid_reservations()
            .any(|reservation| reservation.slot() == slot);

        Ok(exists)
    }

    async fn insert_reservation(&self, reservation: NewReservation) -> Result<Reservation, Error> {
        let mut tables = self.tables.lock()?;
        // Foreign keys
        if tables.court(reservation.slot.court_id).is_none() {
            return Err(Error::CourtNotFound(reservation.slot.court_id));
        }
        if tables.timeslot(reservation.slot.timeslot_id).is_none() {
            return Err(Error::TimeslotNotFound(reservation.slot.timeslot_id));
        }

        let now = Utc::now();
        let stored = Reservation {
            id: Uuid::new_v4(),
            court_id: reservation.slot.court_id,
            timeslot_id: reservation.slot.timeslot_id,
            date: reservation.slot.date,
            status: BookingStatus::Pending,
            total_price: reservation.total_price,
            payment_id: None,
            invoice_url: None,
            invoice_expires_at: None,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
            court: None,
            timeslot: None,
        };
        tables.reservations.push(stored.clone());

        Ok(tables.with_relations(&stored))
    }

    async fn get_reservation(&self, reservation_id: Uuid) -> Result<Reservation, Error> {
        let tables = self.tables.lock()?;
        let reservation = tables
            .reservations
            .iter()
            .find(|reservation| reservation.id == reservation_id)
            .map(|reservation| tables.with_relations(reservation))
            .ok_or(Error::ReservationNotFound(reservation_id))?;

        Ok(reservation)
    }

    async fn update_reservation(&self, reservation: Reservation) -> Result<(), Error> {
        let mut tables = self.tables.lock()?;
        let stored = tables
            .reservations
            .iter_mut()
            .find(|stored| stored.id == reservation.id)
            .ok_or(Error::ReservationNotFound(reservation.id))?;

        // Relations are never stored, only joined on read
        *stored = Reservation {
            court: None,
            timeslot: None,
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..reservation
        };

        Ok(())
    }

    async fn delete_reservation(&self, reservation_id: Uuid) -> Result<(), Error> {
        let mut tables = self.tables.lock()?;
        let before = tables.reservations.len();
        tables
            .reservations
            .retain(|reservation| reservation.id != reservation_id);
        if tables.reservations.len() == before {
            return Err(Error::ReservationNotFound(reservation_id));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryDatabase {
    async fn has_courts(&self) -> Result<bool, Error> {
        Ok(!self.tables.lock()?.courts.is_empty())
    }

    async fn add_court(
        &self,
        name: &str,
        description: &str,
        is_active: bool,
    ) -> Result<Court, Error> {
        self.insert_court(name, description, is_active)
    }

    async fn add_timeslot(
        &self,
        start_time: &str,
        end_time: &str,
        is_active: bool,
    ) -> Result<Timeslot, Error> {
        self.insert_timeslot(start_time, end_time, is_active)
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
        }
    }
}

/// Erased [`PoisonError`]
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use speculoos::prelude::*;

    #[fixture]
    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    /// Store with one court and one timeslot, plus the slot they form on `date`
    async fn store_with_slot(date: NaiveDate) -> (MemoryDatabase, Slot) {
        let database = MemoryDatabase::default();
        let court = database.insert_court("Court A", "", true).unwrap();
        let timeslot = database.insert_timeslot("08:00", "09:00", true).unwrap();
        let slot = Slot {
            court_id: court.id,
            timeslot_id: timeslot.id,
            date,
        };
        (database, slot)
    }

    #[rstest]
    #[tokio::test]
    async fn test_insert_retrieve(date: NaiveDate) {
        let (database, slot) = store_with_slot(date).await;

        let res = database
            .insert_reservation(NewReservation {
                slot,
                total_price: 50_000,
            })
            .await;
        assert_that!(res).is_ok().matches(|reservation| {
            reservation.slot() == slot
                && reservation.status == BookingStatus::Pending
                && reservation.payment_status == PaymentStatus::Pending
        });
        let reservation_id = res.unwrap().id;

        // Retrieving populates the relations
        let res = database.get_reservation(reservation_id).await;
        assert_that!(res).is_ok().matches(|reservation| {
            reservation.court.as_ref().map(|court| court.id) == Some(slot.court_id)
                && reservation.timeslot.as_ref().map(|timeslot| timeslot.id)
                    == Some(slot.timeslot_id)
        });
    }

    #[rstest]
    #[tokio::test]
    async fn test_insert_unknown_court(date: NaiveDate) {
        let (database, slot) = store_with_slot(date).await;
        let unknown = Uuid::new_v4();

        let res = database
            .insert_reservation(NewReservation {
                slot: Slot {
                    court_id: unknown,
                    ..slot
                },
                total_price: 50_000,
            })
            .await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::CourtNotFound(id) if *id == unknown));
        assert_that!(database.reservations().unwrap()).is_empty();
    }

    #[rstest]
    #[tokio::test]
    async fn test_paid_lookups(date: NaiveDate) {
        let (database, slot) = store_with_slot(date).await;
        let mut reservation = database
            .insert_reservation(NewReservation {
                slot,
                total_price: 50_000,
            })
            .await
            .unwrap();

        // A pending reservation does not hold the slot
        assert_that!(database.paid_reservation_exists(slot).await)
            .is_ok()
            .is_false();

        reservation.apply_payment_status(PaymentStatus::Paid);
        database.update_reservation(reservation).await.unwrap();

        assert_that!(database.paid_reservation_exists(slot).await)
            .is_ok()
            .is_true();
        assert_that!(database.paid_timeslot_ids(slot.court_id, date).await)
            .is_ok()
            .matches(|ids| ids.len() == 1 && ids.contains(&slot.timeslot_id));
        // Other dates are unaffected
        let next_day = date.succ_opt().unwrap();
        assert_that!(database.paid_timeslot_ids(slot.court_id, next_day).await)
            .is_ok()
            .matches(|ids| ids.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_keeps_relations_out_of_storage(date: NaiveDate) {
        let (database, slot) = store_with_slot(date).await;
        let reservation = database
            .insert_reservation(NewReservation {
                slot,
                total_price: 50_000,
            })
            .await
            .unwrap();
        assert_that!(reservation.court).is_some();

        database.update_reservation(reservation).await.unwrap();

        let stored = database.reservations().unwrap();
        assert_that!(stored).has_length(1);
        assert_that!(stored[0].court).is_none();
        assert_that!(stored[0].timeslot).is_none();
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete(date: NaiveDate) {
        let (database, slot) = store_with_slot(date).await;
        let reservation = database
            .insert_reservation(NewReservation {
                slot,
                total_price: 50_000,
            })
            .await
            .unwrap();

        assert_that!(database.delete_reservation(reservation.id).await).is_ok();
        assert_that!(database.reservations().unwrap()).is_empty();

        // Deleting twice reports the missing row
        assert_that!(database.delete_reservation(reservation.id).await)
            .is_err()
            .matches(|err| matches!(err, Error::ReservationNotFound(_)));
    }

    #[tokio::test]
    async fn test_active_filters() {
        let database = MemoryDatabase::default();
        database.insert_court("Court A", "", true).unwrap();
        database.insert_court("Court B", "", false).unwrap();
        database.insert_timeslot("08:00", "09:00", false).unwrap();
        database.insert_timeslot("09:00", "10:00", true).unwrap();

        assert_that!(database.list_active_courts().await)
            .is_ok()
            .matches(|courts| courts.len() == 1 && courts[0].name == "Court A");
        assert_that!(database.list_active_timeslots().await)
            .is_ok()
            .matches(|timeslots| timeslots.len() == 1 && timeslots[0].start_time == "09:00");
    }
}
