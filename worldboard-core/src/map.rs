//! The map engine seam.
//!
//! Rendering lives in the browser. The core drives it through [`MapAdapter`],
//! and [`MapScene`] records the resulting scene so a client can mirror it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{WorldboardError, WorldboardResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    Globe,
    Mercator,
}

/// Paint of a circle layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CirclePaint {
    pub radius: f64,
    pub color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for CirclePaint {
    fn default() -> Self {
        CirclePaint {
            radius: 12.0,
            color: "#fff".into(),
            stroke_color: "#000".into(),
            stroke_width: 2.0,
            opacity: 0.95,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub source: String,
    pub paint: CirclePaint,
}

/// `[[west, south], [east, north]]`
pub type Bounds = [[f64; 2]; 2];

pub trait MapAdapter: Send {
    fn set_style(&mut self, url: &str);
    fn set_projection(&mut self, projection: Projection);
    fn set_min_zoom(&mut self, zoom: Option<f64>);
    fn set_max_bounds(&mut self, bounds: Option<Bounds>);

    fn has_source(&self, id: &str) -> bool;
    fn add_source(&mut self, id: &str, data: Value);
    fn set_source_data(&mut self, id: &str, data: Value) -> WorldboardResult<()>;
    fn remove_source(&mut self, id: &str);

    fn has_layer(&self, id: &str) -> bool;
    fn add_layer(&mut self, layer: Layer);
    fn remove_layer(&mut self, id: &str);

    /// Filter expression on a layer. `None` clears it.
    fn set_filter(&mut self, layer: &str, filter: Option<Value>);
    fn set_labels_visible(&mut self, visible: bool);
}

/// Recorded map state.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MapScene {
    pub style: String,
    /// Bumped on every style change so clients know to reload.
    pub style_generation: u64,
    pub projection: Projection,
    pub min_zoom: Option<f64>,
    pub max_bounds: Option<Bounds>,
    pub sources: BTreeMap<String, Value>,
    pub layers: Vec<Layer>,
    pub filters: BTreeMap<String, Value>,
    pub labels_visible: bool,
}

impl MapScene {
    pub fn new(style: &str) -> Self {
        MapScene {
            style: style.to_string(),
            labels_visible: true,
            ..MapScene::default()
        }
    }

    pub fn source(&self, id: &str) -> Option<&Value> {
        self.sources.get(id)
    }

    pub fn filter(&self, layer: &str) -> Option<&Value> {
        self.filters.get(layer)
    }
}

impl MapAdapter for MapScene {
    fn set_style(&mut self, url: &str) {
        self.style = url.to_string();
        self.style_generation += 1;
    }

    fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    fn set_min_zoom(&mut self, zoom: Option<f64>) {
        self.min_zoom = zoom;
    }

    fn set_max_bounds(&mut self, bounds: Option<Bounds>) {
        self.max_bounds = bounds;
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn add_source(&mut self, id: &str, data: Value) {
        self.sources.insert(id.to_string(), data);
    }

    fn set_source_data(&mut self, id: &str, data: Value) -> WorldboardResult<()> {
        match self.sources.get_mut(id) {
            Some(slot) => {
                *slot = data;
                Ok(())
            }
            None => Err(WorldboardError::NotFound(format!("map source '{id}'"))),
        }
    }

    fn remove_source(&mut self, id: &str) {
        self.sources.remove(id);
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    fn add_layer(&mut self, layer: Layer) {
        self.layers.retain(|l| l.id != layer.id);
        self.layers.push(layer);
    }

    fn remove_layer(&mut self, id: &str) {
        self.layers.retain(|l| l.id != id);
        self.filters.remove(id);
    }

    fn set_filter(&mut self, layer: &str, filter: Option<Value>) {
        match filter {
            Some(f) => {
                self.filters.insert(layer.to_string(), f);
            }
            None => {
                self.filters.remove(layer);
            }
        }
    }

    fn set_labels_visible(&mut self, visible: bool) {
        self.labels_visible = visible;
    }
}
