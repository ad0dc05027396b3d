use thiserror::Error;

/// Failure talking to the admin endpoint.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid admin URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Connection error for {url}: {reason}")]
    Connection { url: String, reason: String },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body from {url}: {reason}")]
    Body { url: String, reason: String },
}

/// A stats line that does not have the `name: value` shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed stats line {line_number}: {line:?}")]
pub struct MalformedLineError {
    pub line_number: usize,
    pub line: String,
}

/// Anything that prevents a snapshot from being produced.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Malformed(#[from] MalformedLineError),
}
