pub mod bounds;
pub mod markers;
pub mod orchestrator;
pub mod session;
pub mod widget;

pub use crate::domain::model::{GeoPoint, Marker, RawEvent, RawPoint, RenderMode, RenderReport};
pub use crate::domain::ports::{
    ConfigProvider, DataSource, MapProvider, MapSurface, Storage,
};
pub use crate::utils::error::Result;
