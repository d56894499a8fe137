pub mod database;
pub mod payment;
