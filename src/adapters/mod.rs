pub mod database;
pub mod http;
pub mod payment;
