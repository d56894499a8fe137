//! Court reservation backend
//!
//! Availability, reservation admission and payment reconciliation for a small sports
//! facility. The domain commands in [`commands`] talk to the outside world only through the
//! traits in [`ports`]; [`adapters`] holds the concrete implementations.

pub mod adapters;
pub mod commands;
pub mod config;
pub mod domain;
pub mod ports;
