use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Customer, Invoice};

#[mockall::automock]
#[async_trait::async_trait]
pub trait PaymentPort {
    async fn create_invoice(&self, request: InvoiceRequest) -> Result<Invoice, Error>;
}

/// Everything the payment provider needs to bill a reservation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvoiceRequest {
    /// Identifier the provider echoes back in its callbacks
    pub external_id: String,
    pub amount: u64,
    pub description: String,
    /// How long the invoice can be paid for
    pub invoice_duration_secs: u32,
    pub customer: Customer,
    pub items: Vec<InvoiceItem>,
    pub metadata: InvoiceMetadata,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvoiceItem {
    pub name: String,
    pub quantity: u32,
    pub price: u64,
    pub category: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvoiceMetadata {
    pub reservation_id: Uuid,
    pub court_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The provider answered with a non-success status
    #[error("payment provider rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
