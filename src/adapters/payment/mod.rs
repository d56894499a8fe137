pub mod xendit;
