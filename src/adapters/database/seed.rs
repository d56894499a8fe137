//! Demo data for a fresh store

use crate::{
    domain::{Court, Timeslot},
    ports::database::Error,
};

const COURTS: [(&str, &str, bool); 4] = [
    ("Court A", "Main badminton court with LED lighting", true),
    ("Court B", "Badminton court with synthetic flooring", true),
    ("Court C", "Air-conditioned indoor badminton court", true),
    ("Court D", "Outdoor badminton court", false),
];

const TIMESLOTS: [(&str, &str, bool); 12] = [
    ("08:00", "09:00", true),
    ("09:00", "10:00", true),
    ("10:00", "11:00", true),
    ("11:00", "12:00", true),
    ("13:00", "14:00", true),
    ("14:00", "15:00", true),
    ("15:00", "16:00", true),
    ("16:00", "17:00", true),
    ("18:00", "19:00", true),
    ("19:00", "20:00", true),
    ("20:00", "21:00", true),
    ("21:00", "22:00", false),
];

/// Write access to the court and timeslot catalog
///
/// Reservations never create catalog rows, so this lives next to the seed data rather than on
/// the database port.
#[async_trait::async_trait]
pub trait CatalogStore {
    async fn has_courts(&self) -> Result<bool, Error>;
    async fn add_court(
        &self,
        name: &str,
        description: &str,
        is_active: bool,
    ) -> Result<Court, Error>;
    async fn add_timeslot(
        &self,
        start_time: &str,
        end_time: &str,
        is_active: bool,
    ) -> Result<Timeslot, Error>;
}

/// Populate the store with four courts and twelve hourly timeslots
///
/// One court and one timeslot are inactive, so they never show up in availability. A store
/// that already has courts is left untouched.
pub async fn seed_demo_data<S>(store: &S) -> Result<(), Error>
where
    S: CatalogStore + Sync,
{
    if store.has_courts().await? {
        tracing::info!("store already has courts, skipping demo data");
        return Ok(());
    }

    for (name, description, is_active) in COURTS {
        store.add_court(name, description, is_active).await?;
    }
    for (start_time, end_time, is_active) in TIMESLOTS {
        store.add_timeslot(start_time, end_time, is_active).await?;
    }

    tracing::info!(
        courts = COURTS.len(),
        timeslots = TIMESLOTS.len(),
        "seeded demo data"
    );

    Ok(())
}
