pub mod args;
pub mod config;
pub mod error;
pub mod fields;
pub mod history;
pub mod render;
pub mod sampler;

pub use config::{FetchFailurePolicy, Settings};
pub use error::{ConfigError, FieldError, SampleError};
pub use fields::{resolve_fields, FieldSpec};
pub use history::{compute_row, DisplayValue, Row, SnapshotHistory};
pub use sampler::{Sampler, SamplerState, SamplerSummary};
