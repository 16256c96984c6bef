pub mod analyzers;
pub mod coordinator;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod services;
pub mod thresholds;
