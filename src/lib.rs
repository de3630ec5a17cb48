pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{HttpDataSource, LocalStorage, MapSnapshot, SnapshotProvider, SnapshotSurface};
pub use config::SessionConfig;
pub use core::{
    bounds::{inside, BoundingBox, CONTINENTAL_US},
    markers::build,
    orchestrator::FetchOrchestrator,
    session::MapSession,
    widget::MapWidget,
};
pub use utils::error::{MapError, Result};
