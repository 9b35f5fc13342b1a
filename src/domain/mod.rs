pub mod aggregate;
pub mod insights;
pub mod metrics;
pub mod weather;
