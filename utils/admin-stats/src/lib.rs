pub mod admin_client;
pub mod error;
pub mod snapshot;
pub mod snapshot_source;

pub use admin_client::{parse_admin_url, AdminClient, SERVER_INFO_PATH, STATS_PATH};
pub use error::{FetchError, MalformedLineError, TransportError};
pub use snapshot::{parse_line, parse_snapshot, ParsedLine, Snapshot};
pub use snapshot_source::SnapshotSource;
