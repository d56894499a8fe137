use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable court
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Inactive courts are hidden from availability
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A daily time window that can be booked on any court
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeslot {
    pub id: Uuid,
    /// Wall-clock start time, formatted as `HH:MM`
    pub start_time: String,
    /// Wall-clock end time, formatted as `HH:MM`
    pub end_time: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A (court, timeslot, date) triple
///
/// This is the unit of availability and conflict checking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Slot {
    pub court_id: Uuid,
    pub timeslot_id: Uuid,
    pub date: NaiveDate,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "court {} / timeslot {} on {}",
            self.court_id, self.timeslot_id, self.date
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Paid,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Paid => "paid",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownBookingStatus;

    fn from_str(status: &str) -> Result<Self, Self::Err> {
        match status {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "paid" => Ok(BookingStatus::Paid),
            other => Err(UnknownBookingStatus(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown booking status {0:?}")]
pub struct UnknownBookingStatus(String);

/// Payment status as reported by the payment provider
///
/// Unknown values are kept verbatim in `Other` so that nothing the provider reports is lost.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Expired,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Expired => "EXPIRED",
            PaymentStatus::Other(status) => status,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "PENDING" => PaymentStatus::Pending,
            "PAID" => PaymentStatus::Paid,
            "FAILED" => PaymentStatus::Failed,
            "EXPIRED" => PaymentStatus::Expired,
            _ => PaymentStatus::Other(status),
        }
    }
}

impl From<&str> for PaymentStatus {
    fn from(status: &str) -> Self {
        status.to_string().into()
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A court booking for one timeslot on one date
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub court_id: Uuid,
    pub timeslot_id: Uuid,
    pub date: NaiveDate,
    pub status: BookingStatus,
    /// Amount charged, in the invoice currency
    pub total_price: u64,
    /// Invoice identifier at the payment provider
    pub payment_id: Option<String>,
    pub invoice_url: Option<String>,
    pub invoice_expires_at: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Populated when the reservation is loaded with its relations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<Court>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeslot: Option<Timeslot>,
}

impl Reservation {
    pub fn slot(&self) -> Slot {
        Slot {
            court_id: self.court_id,
            timeslot_id: self.timeslot_id,
            date: self.date,
        }
    }

    /// Link the reservation to a freshly created invoice
    pub fn attach_invoice(&mut self, invoice: &Invoice) {
        self.payment_id = Some(invoice.id.clone());
        self.invoice_url = Some(invoice.invoice_url.clone());
        self.invoice_expires_at = invoice.expiry_date;
        self.payment_status = invoice.status.clone();
    }

    /// Record a provider-reported payment status
    ///
    /// Only `PAID` moves the booking status forward; every other value just overwrites the
    /// stored payment status.
    pub fn apply_payment_status(&mut self, payment_status: PaymentStatus) {
        if payment_status == PaymentStatus::Paid {
            self.status = BookingStatus::Paid;
        }
        self.payment_status = payment_status;
    }
}

/// Data needed to insert a provisional reservation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewReservation {
    pub slot: Slot,
    pub total_price: u64,
}

/// Person paying for a reservation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub given_names: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    pub email: String,
    pub mobile_number: String,
}

impl Customer {
    /// Name of the first required field that is blank, if any
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("given_names", &self.given_names),
            ("email", &self.email),
            ("mobile_number", &self.mobile_number),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Invoice issued by the payment provider
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invoice {
    pub id: String,
    pub status: PaymentStatus,
    pub invoice_url: String,
    /// After this instant the invoice can no longer be paid
    pub expiry_date: Option<DateTime<Utc>>,
}

/// Availability of every active court for a given date
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub courts: Vec<CourtAvailability>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CourtAvailability {
    pub court: Court,
    pub timeslots: Vec<TimeslotWithStatus>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimeslotWithStatus {
    pub timeslot: Timeslot,
    pub is_booked: bool,
}

/// Decides how much a slot costs
pub trait PricingPolicy: Send + Sync {
    fn price(&self, slot: &Slot) -> u64;
}

/// Same price for every slot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedPrice(pub u64);

impl Default for FixedPrice {
    fn default() -> Self {
        Self(50_000)
    }
}

impl PricingPolicy for FixedPrice {
    fn price(&self, _slot: &Slot) -> u64 {
        self.0
    }
}
