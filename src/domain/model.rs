use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::style::StyleRule;
use crate::utils::error::Result;

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A location as the data source sent it. Missing, null or non-numeric
/// coordinates decode as `None` and never become a [`GeoPoint`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    #[serde(
        default,
        deserialize_with = "lenient_coordinate",
        skip_serializing_if = "Option::is_none"
    )]
    pub lat: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_coordinate",
        skip_serializing_if = "Option::is_none"
    )]
    pub lng: Option<f64>,
}

impl RawPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    pub fn to_geo(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.lat?, self.lng?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub locations: Vec<RawPoint>,
}

/// The `{ "events": [...] }` envelope returned by the data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventsDocument {
    pub events: Vec<RawEvent>,
}

impl EventsDocument {
    /// Decodes a response body. Some backends serialize the document twice,
    /// so a body that is a JSON string is unwrapped once before decoding.
    pub fn from_json_str(body: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        let value = match value {
            serde_json::Value::String(inner) => serde_json::from_str(&inner)?,
            other => other,
        };
        Ok(serde_json::from_value(value)?)
    }

    pub fn location_count(&self) -> usize {
        self.events.iter().map(|e| e.locations.len()).sum()
    }
}

fn lenient_coordinate<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "event id must be a string or number, got {}",
            other
        ))),
    }
}

/// A bounds-checked point tied to an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub address: String,
    pub title: String,
    pub id: String,
    pub position: GeoPoint,
}

impl Marker {
    pub fn popup(&self) -> InfoPopup {
        InfoPopup {
            address: self.address.clone(),
            title: self.title.clone(),
            id: self.id.clone(),
        }
    }
}

/// What a pin reveals when clicked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoPopup {
    pub address: String,
    pub title: String,
    pub id: String,
}

impl InfoPopup {
    pub fn to_html(&self) -> String {
        format!(
            "<b>Address:</b> {}<br><b>Title:</b> {}<br><b>ID:</b> {}<br>",
            self.address, self.title, self.id
        )
    }
}

/// Everything a surface needs to draw one clickable pin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinSpec {
    pub position: GeoPoint,
    pub title: String,
    pub popup: InfoPopup,
}

impl From<&Marker> for PinSpec {
    fn from(marker: &Marker) -> Self {
        Self {
            position: marker.position,
            title: marker.title.clone(),
            popup: marker.popup(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapOptions {
    pub radius: u32,
    pub max_intensity: u32,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            radius: 45,
            max_intensity: 10,
        }
    }
}

/// Construction-time options for the one map a session owns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    pub container_id: String,
    pub center: GeoPoint,
    pub zoom: u8,
    pub scrollwheel: bool,
    /// `None` renders the provider's default look.
    pub styles: Option<Vec<StyleRule>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Markers,
    Heatmap,
}

impl RenderMode {
    pub const ALL: [RenderMode; 2] = [RenderMode::Markers, RenderMode::Heatmap];

    pub(crate) fn index(self) -> usize {
        match self {
            RenderMode::Markers => 0,
            RenderMode::Heatmap => 1,
        }
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Markers => write!(f, "markers"),
            RenderMode::Heatmap => write!(f, "heatmap"),
        }
    }
}

/// Outcome of one successful fetch-and-render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderReport {
    pub mode: RenderMode,
    pub events: usize,
    pub markers: usize,
    pub discarded: usize,
    pub completed_at: DateTime<Utc>,
}
