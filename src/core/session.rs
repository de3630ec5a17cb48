use crate::core::{MapProvider, MapSurface};
use crate::domain::model::{GeoPoint, HeatmapOptions, MapOptions, Marker, PinSpec};
use crate::utils::error::Result;

/// Owns one map surface plus every handle rendered on it.
///
/// Both replace operations run to completion under `&mut self`, so a caller
/// sharing the session behind a lock never observes a half-replaced set.
pub struct MapSession<S: MapSurface> {
    surface: S,
    options: MapOptions,
    markers: Vec<Marker>,
    pins: Vec<S::Pin>,
    heatmap: Option<S::Layer>,
    heatmap_samples: Vec<GeoPoint>,
    heatmap_options: HeatmapOptions,
}

impl<S: MapSurface> MapSession<S> {
    pub fn open<P>(provider: &P, options: MapOptions) -> Result<Self>
    where
        P: MapProvider<Surface = S>,
    {
        let surface = provider.create_map(&options)?;
        tracing::debug!(
            "Opened map in '{}' centered at ({}, {})",
            options.container_id,
            options.center.lat,
            options.center.lng
        );

        Ok(Self {
            surface,
            options,
            markers: Vec::new(),
            pins: Vec::new(),
            heatmap: None,
            heatmap_samples: Vec::new(),
            heatmap_options: HeatmapOptions::default(),
        })
    }

    /// Renders one pin per marker, then detaches the previous pins.
    ///
    /// If the surface rejects a pin, the new pins added so far are removed
    /// and the previous set stays rendered.
    pub fn replace_markers(&mut self, markers: Vec<Marker>) -> Result<()> {
        let mut pins = Vec::with_capacity(markers.len());
        for marker in &markers {
            match self.surface.add_pin(PinSpec::from(marker)) {
                Ok(pin) => pins.push(pin),
                Err(e) => {
                    tracing::warn!("Pin rejected after {} of {}: {}", pins.len(), markers.len(), e);
                    for pin in pins {
                        self.surface.remove_pin(pin);
                    }
                    return Err(e);
                }
            }
        }

        let previous = std::mem::replace(&mut self.pins, pins);
        for pin in previous {
            self.surface.remove_pin(pin);
        }
        self.markers = markers;
        tracing::debug!("Rendered {} markers", self.pins.len());
        Ok(())
    }

    /// Swaps the density layer for one sampled at the markers' positions.
    ///
    /// The old layer is detached first so at most one is ever attached. If
    /// the surface rejects the new layer, the previous samples are put back.
    pub fn replace_heatmap(&mut self, markers: &[Marker]) -> Result<()> {
        let points: Vec<GeoPoint> = markers.iter().map(|m| m.position).collect();
        let had_layer = match self.heatmap.take() {
            Some(layer) => {
                self.surface.remove_heatmap(layer);
                true
            }
            None => false,
        };

        match self.surface.add_heatmap(points.clone(), self.heatmap_options) {
            Ok(layer) => {
                tracing::debug!("Rendered heatmap with {} points", points.len());
                self.heatmap = Some(layer);
                self.heatmap_samples = points;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Heatmap layer rejected: {}", e);
                if had_layer {
                    self.restore_heatmap();
                }
                Err(e)
            }
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker_count(&self) -> usize {
        self.pins.len()
    }

    pub fn has_heatmap(&self) -> bool {
        self.heatmap.is_some()
    }

    /// Sample count of the attached heatmap, `None` when no layer is attached.
    pub fn heatmap_points(&self) -> Option<usize> {
        self.heatmap.as_ref().map(|_| self.heatmap_samples.len())
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Tears the session down, detaching everything it rendered.
    pub fn close(mut self) -> S {
        self.clear_pins();
        if let Some(layer) = self.heatmap.take() {
            self.surface.remove_heatmap(layer);
        }
        self.surface
    }

    fn restore_heatmap(&mut self) {
        match self
            .surface
            .add_heatmap(self.heatmap_samples.clone(), self.heatmap_options)
        {
            Ok(layer) => self.heatmap = Some(layer),
            Err(e) => {
                tracing::error!("Could not restore previous heatmap: {}", e);
                self.heatmap_samples.clear();
            }
        }
    }

    fn clear_pins(&mut self) {
        for pin in self.pins.drain(..) {
            self.surface.remove_pin(pin);
        }
        self.markers.clear();
    }
}
