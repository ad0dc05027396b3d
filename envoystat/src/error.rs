use admin_stats::{FetchError, TransportError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("Field token {token:?} has no metric name")]
    Empty { token: String },

    #[error("At least one field is required")]
    NoFields,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ext_config::ConfigError),

    #[error("Invalid field: {0}")]
    Field(#[from] FieldError),

    #[error("Invalid admin address: {0}")]
    Admin(#[from] TransportError),

    #[error("Interval must be a positive number of seconds, got {0}")]
    Interval(f64),

    #[error("Timeout must be greater than zero milliseconds")]
    Timeout,
}

/// Errors raised while sampling
#[derive(Error, Debug)]
pub enum SampleError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A counter is present now but was absent from the previous snapshot
    #[error("Counter {name} has no baseline in the previous snapshot")]
    MissingBaseline { name: String },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
