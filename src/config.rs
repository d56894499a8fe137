//! Service configuration, read from environment variables

use std::str::FromStr;

use crate::adapters::payment::xendit::XenditConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub http_port: u16,
    /// PostgreSQL connection string; the in-memory store is used when unset
    pub database_url: Option<String>,
    pub xendit: XenditConfig,
    /// Price of every slot, in the invoice currency
    pub reservation_price: u64,
    /// Fill the in-memory store with demo courts and timeslots at startup
    pub seed_demo_data: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable lookup
    ///
    /// Unset or empty variables fall back to their defaults.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let defaults = XenditConfig::default();

        Ok(Self {
            http_port: parse(&var, "HTTP_PORT", 8080)?,
            database_url: var("DATABASE_URL"),
            xendit: XenditConfig {
                base_url: var("XENDIT_BASE_URL").unwrap_or(defaults.base_url),
                username: var("XENDIT_USERNAME").unwrap_or(defaults.username),
                password: var("XENDIT_PASSWORD").unwrap_or(defaults.password),
                success_redirect_url: var("XENDIT_SUCCESS_REDIRECT_URL")
                    .unwrap_or(defaults.success_redirect_url),
                failure_redirect_url: var("XENDIT_FAILURE_REDIRECT_URL")
                    .unwrap_or(defaults.failure_redirect_url),
                item_url: var("XENDIT_ITEM_URL").unwrap_or(defaults.item_url),
                currency: var("INVOICE_CURRENCY").unwrap_or(defaults.currency),
            },
            reservation_price: parse(&var, "RESERVATION_PRICE", 50_000)?,
            seed_demo_data: parse(&var, "SEED_DEMO_DATA", true)?,
        })
    }
}

fn parse<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, Error> {
    match var(name) {
        Some(value) => value
            .parse()
            .map_err(|_| Error::InvalidValue { name, value }),
        None => Ok(default),
    }
}
