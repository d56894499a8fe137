use std::{borrow::Cow, sync::Arc};

use crate::domain::{PricingPolicy, Slot};

pub mod create_reservation;
pub mod day_availability;
pub mod update_payment_status;

pub struct DomainLogic<D, P> {
    database: Arc<D>,
    payment: Arc<P>,
    pricing: Arc<dyn PricingPolicy>,
}

impl<D, P> DomainLogic<D, P> {
    pub fn new(database: Arc<D>, payment: Arc<P>, pricing: Arc<dyn PricingPolicy>) -> Self {
        Self {
            database,
            payment,
            pricing,
        }
    }
}

// Ports are shared, so cloning never requires `D: Clone` or `P: Clone`
impl<D, P> Clone for DomainLogic<D, P> {
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone(),
            payment: self.payment.clone(),
            pricing: self.pricing.clone(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("database port error: {0}")]
    Database(#[from] crate::ports::database::Error),
    /// Invoice creation failed; the provisional reservation has been removed
    #[error("failed to create invoice: {0}")]
    Invoice(#[source] crate::ports::payment::Error),

    #[error("slot is already reserved: {0}")]
    SlotAlreadyReserved(Slot),
    #[error("invalid input: {0}")]
    InvalidInput(Cow<'static, str>),
}
