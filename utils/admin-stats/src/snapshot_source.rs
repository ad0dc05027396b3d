use async_trait::async_trait;

use crate::{error::FetchError, snapshot::Snapshot};

/// Anything that can produce a fresh [`Snapshot`] on demand.
/// Implemented by [`crate::AdminClient`]; the sampling loop only sees this trait.
#[async_trait]
pub trait SnapshotSource {
    async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError>;
}
