#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::GeoPoint;
use crate::utils::error::Result;
use crate::utils::validation::{
    require_at_least, require_http_url, require_path, require_text, require_within, Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REGION: GeoPoint = GeoPoint::new(39.50, -98.35);

/// Everything a map widget needs at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub api_path: String,
    pub container_id: String,
    pub initial_region: GeoPoint,
    pub is_political: bool,
    pub show_heatmap: bool,
    pub show_markers: bool,
    pub timeout_seconds: u64,
    pub output_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_path: String::new(),
            container_id: "map".to_string(),
            initial_region: DEFAULT_REGION,
            is_political: true,
            show_heatmap: true,
            show_markers: true,
            timeout_seconds: 30,
            output_path: "./output".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn new(api_path: impl Into<String>, container_id: impl Into<String>) -> Self {
        Self {
            api_path: api_path.into(),
            container_id: container_id.into(),
            ..Self::default()
        }
    }
}

impl ConfigProvider for SessionConfig {
    fn api_path(&self) -> &str {
        &self.api_path
    }

    fn container_id(&self) -> &str {
        &self.container_id
    }

    fn initial_region(&self) -> GeoPoint {
        self.initial_region
    }

    fn is_political(&self) -> bool {
        self.is_political
    }

    fn show_heatmap(&self) -> bool {
        self.show_heatmap
    }

    fn show_markers(&self) -> bool {
        self.show_markers
    }
}

impl Validate for SessionConfig {
    fn validate(&self) -> Result<()> {
        require_http_url("api_path", &self.api_path)?;
        require_text("container_id", &self.container_id)?;
        require_within("initial_region.lat", self.initial_region.lat, -90.0, 90.0)?;
        require_within("initial_region.lng", self.initial_region.lng, -180.0, 180.0)?;
        require_at_least("timeout_seconds", self.timeout_seconds, 1)?;
        require_path("output_path", &self.output_path)?;

        if !self.show_heatmap && !self.show_markers {
            tracing::warn!("Both heatmap and markers are disabled; nothing will be rendered");
        }
        Ok(())
    }
}
