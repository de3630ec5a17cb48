use crate::domain::model::{GeoPoint, HeatmapOptions, MapOptions, PinSpec, RawEvent, RenderMode};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_path(&self) -> &str;
    fn container_id(&self) -> &str;
    fn initial_region(&self) -> GeoPoint;
    fn is_political(&self) -> bool;
    fn show_heatmap(&self) -> bool;
    fn show_markers(&self) -> bool;

    /// Render modes switched on, markers first.
    fn enabled_modes(&self) -> Vec<RenderMode> {
        let mut modes = Vec::with_capacity(2);
        if self.show_markers() {
            modes.push(RenderMode::Markers);
        }
        if self.show_heatmap() {
            modes.push(RenderMode::Heatmap);
        }
        modes
    }
}

/// Supplies the full event dataset. The same dataset backs every render mode.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_events(&self) -> Result<Vec<RawEvent>>;
}

/// Creates the map a session draws on.
pub trait MapProvider {
    type Surface: MapSurface;

    fn create_map(&self, options: &MapOptions) -> Result<Self::Surface>;
}

/// Drawing primitives of one map. Handles returned by `add_*` are owned by
/// the caller and must be handed back to the matching `remove_*`.
pub trait MapSurface: Send {
    type Pin: Send;
    type Layer: Send;

    /// Attaches a pin that shows `pin.popup` when clicked.
    fn add_pin(&mut self, pin: PinSpec) -> Result<Self::Pin>;
    fn remove_pin(&mut self, pin: Self::Pin);
    fn add_heatmap(&mut self, points: Vec<GeoPoint>, options: HeatmapOptions) -> Result<Self::Layer>;
    fn remove_heatmap(&mut self, layer: Self::Layer);
}
