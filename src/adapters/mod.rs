// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod snapshot;
pub mod storage;

pub use http::HttpDataSource;
pub use snapshot::{MapSnapshot, SnapshotProvider, SnapshotSurface};
pub use storage::LocalStorage;
