//! A map provider that keeps rendered state in memory and can export it.
//!
//! It backs the CLI, where there is no interactive map to draw on, and
//! doubles as the surface used by the crate's tests.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::{MapProvider, MapSurface, Storage};
use crate::domain::model::{GeoPoint, HeatmapOptions, InfoPopup, MapOptions, PinSpec};
use crate::utils::error::{MapError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PinId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapLayer {
    pub points: Vec<GeoPoint>,
    pub options: HeatmapOptions,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotProvider;

impl MapProvider for SnapshotProvider {
    type Surface = SnapshotSurface;

    fn create_map(&self, options: &MapOptions) -> Result<SnapshotSurface> {
        if options.container_id.trim().is_empty() {
            return Err(MapError::surface("map container id is empty"));
        }
        Ok(SnapshotSurface {
            options: options.clone(),
            next_id: 0,
            pins: BTreeMap::new(),
            heatmap: None,
        })
    }
}

#[derive(Debug)]
pub struct SnapshotSurface {
    options: MapOptions,
    next_id: u64,
    pins: BTreeMap<PinId, PinSpec>,
    heatmap: Option<(LayerId, HeatmapLayer)>,
}

impl SnapshotSurface {
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    pub fn pin_ids(&self) -> Vec<PinId> {
        self.pins.keys().copied().collect()
    }

    /// What clicking the pin would reveal.
    pub fn click(&self, pin: PinId) -> Option<&InfoPopup> {
        self.pins.get(&pin).map(|spec| &spec.popup)
    }

    pub fn heatmap(&self) -> Option<&HeatmapLayer> {
        self.heatmap.as_ref().map(|(_, layer)| layer)
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            options: self.options.clone(),
            pins: self.pins.values().cloned().collect(),
            heatmap: self.heatmap().cloned(),
            taken_at: Utc::now(),
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MapSurface for SnapshotSurface {
    type Pin = PinId;
    type Layer = LayerId;

    fn add_pin(&mut self, pin: PinSpec) -> Result<PinId> {
        let id = PinId(self.next_id());
        self.pins.insert(id, pin);
        Ok(id)
    }

    fn remove_pin(&mut self, pin: PinId) {
        if self.pins.remove(&pin).is_none() {
            tracing::warn!("Removing unknown pin {:?}", pin);
        }
    }

    fn add_heatmap(&mut self, points: Vec<GeoPoint>, options: HeatmapOptions) -> Result<LayerId> {
        if self.heatmap.is_some() {
            return Err(MapError::surface("a heatmap layer is already attached"));
        }
        let id = LayerId(self.next_id());
        self.heatmap = Some((id, HeatmapLayer { points, options }));
        Ok(id)
    }

    fn remove_heatmap(&mut self, layer: LayerId) {
        if self.heatmap.as_ref().map(|(current, _)| *current) == Some(layer) {
            self.heatmap = None;
        } else {
            tracing::warn!("Removing unknown heatmap layer {:?}", layer);
        }
    }
}

/// Point-in-time copy of a surface, detached from the session lock.
#[derive(Debug, Clone, Serialize)]
pub struct MapSnapshot {
    pub options: MapOptions,
    pub pins: Vec<PinSpec>,
    pub heatmap: Option<HeatmapLayer>,
    pub taken_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct PinRow<'a> {
    id: &'a str,
    title: &'a str,
    address: &'a str,
    lat: f64,
    lng: f64,
}

impl MapSnapshot {
    pub const MAP_FILE: &'static str = "map.json";
    pub const MARKERS_FILE: &'static str = "markers.csv";
    pub const HEATMAP_FILE: &'static str = "heatmap.json";

    pub fn markers_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for pin in &self.pins {
            writer.serialize(PinRow {
                id: &pin.popup.id,
                title: &pin.popup.title,
                address: &pin.popup.address,
                lat: pin.position.lat,
                lng: pin.position.lng,
            })?;
        }
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| MapError::IoError(std::io::Error::new(e.error().kind(), e.error().to_string())))
    }

    /// Writes the snapshot files and returns their names. The heatmap file
    /// is only written when a layer is attached.
    pub async fn write_to<S: Storage>(&self, storage: &S) -> Result<Vec<String>> {
        let mut written = Vec::new();

        let map = serde_json::json!({
            "options": &self.options,
            "pins": self.pins.len(),
            "heatmap": self.heatmap.is_some(),
            "takenAt": self.taken_at,
        });
        storage
            .write_file(Self::MAP_FILE, serde_json::to_string_pretty(&map)?.as_bytes())
            .await?;
        written.push(Self::MAP_FILE.to_string());

        storage.write_file(Self::MARKERS_FILE, &self.markers_csv()?).await?;
        written.push(Self::MARKERS_FILE.to_string());

        if let Some(layer) = &self.heatmap {
            let json = serde_json::to_string_pretty(layer)?;
            storage.write_file(Self::HEATMAP_FILE, json.as_bytes()).await?;
            written.push(Self::HEATMAP_FILE.to_string());
        }

        tracing::debug!("Snapshot written: {}", written.join(", "));
        Ok(written)
    }
}
