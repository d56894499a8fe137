//! Xendit invoice API over plain REST

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{Customer, Invoice, PaymentStatus},
    ports::payment::{Error, InvoiceRequest, PaymentPort},
};

const API_VERSION: &str = "2020-02-01";

/// Connection and invoice settings for Xendit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XenditConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Where the customer lands after paying
    pub success_redirect_url: String,
    /// Where the customer lands after a failed or expired payment
    pub failure_redirect_url: String,
    /// Link attached to every invoice line item
    pub item_url: String,
    pub currency: String,
}

impl Default for XenditConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.xendit.co".to_string(),
            username: String::new(),
            password: String::new(),
            success_redirect_url: "http://localhost:3000/success".to_string(),
            failure_redirect_url: "http://localhost:3000/failed".to_string(),
            item_url: "http://localhost:3000".to_string(),
            currency: "IDR".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct XenditClient {
    http: reqwest::Client,
    config: XenditConfig,
}

impl XenditClient {
    pub fn new(config: XenditConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn invoice_body<'a>(&'a self, request: &'a InvoiceRequest) -> CreateInvoiceBody<'a> {
        CreateInvoiceBody {
            external_id: &request.external_id,
            amount: request.amount,
            description: &request.description,
            invoice_duration: request.invoice_duration_secs,
            customer: &request.customer,
            success_redirect_url: &self.config.success_redirect_url,
            failure_redirect_url: &self.config.failure_redirect_url,
            currency: &self.config.currency,
            items: request
                .items
                .iter()
                .map(|item| InvoiceItemBody {
                    name: &item.name,
                    quantity: item.quantity,
                    price: item.price,
                    category: &item.category,
                    url: &self.config.item_url,
                })
                .collect(),
            metadata: MetadataBody {
                reservation_id: request.metadata.reservation_id,
                court_id: request.metadata.court_id,
                date: request.metadata.date,
            },
        }
    }
}

#[async_trait::async_trait]
impl PaymentPort for XenditClient {
    async fn create_invoice(&self, request: InvoiceRequest) -> Result<Invoice, Error> {
        let url = format!("{}/v2/invoices", self.config.base_url.trim_end_matches('/'));
        let resp = self
            .http
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("X-API-VERSION", API_VERSION)
            .json(&self.invoice_body(&request))
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = match resp.text().await {
                Ok(body) => body,
                Err(err) => format!("unreadable response body: {err}"),
            };
            tracing::warn!(status = status.as_u16(), %body, "Xendit rejected invoice request");
            return Err(Error::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let invoice: InvoiceResponse = resp.json().await?;
        tracing::debug!(invoice_id = %invoice.id, external_id = %invoice.external_id, "created Xendit invoice");

        Ok(Invoice {
            id: invoice.id,
            status: invoice.status,
            invoice_url: invoice.invoice_url,
            expiry_date: invoice.expiry_date,
        })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Adapter(Box::new(err))
    }
}

#[derive(Debug, Serialize)]
struct CreateInvoiceBody<'a> {
    external_id: &'a str,
    amount: u64,
    description: &'a str,
    invoice_duration: u32,
    customer: &'a Customer,
    success_redirect_url: &'a str,
    failure_redirect_url: &'a str,
    currency: &'a str,
    items: Vec<InvoiceItemBody<'a>>,
    metadata: MetadataBody,
}

#[derive(Debug, Serialize)]
struct InvoiceItemBody<'a> {
    name: &'a str,
    quantity: u32,
    price: u64,
    category: &'a str,
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct MetadataBody {
    reservation_id: Uuid,
    court_id: Uuid,
    date: NaiveDate,
}

/// Subset of the invoice object returned by Xendit
#[derive(Debug, Deserialize)]
struct InvoiceResponse {
    id: String,
    external_id: String,
    status: PaymentStatus,
    invoice_url: String,
    #[serde(default)]
    expiry_date: Option<DateTime<Utc>>,
}
