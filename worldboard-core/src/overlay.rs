//! Point datasets drawn on top of the map, one at a time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::DataSource;
use crate::error::{WorldboardError, WorldboardResult};
use crate::map::{CirclePaint, Layer, MapAdapter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Ports,
    Nuclear,
    OilFields,
    Pipelines,
    Powerlines,
    Refineries,
    IndustrialZones,
    TradeZones,
}

impl Dataset {
    pub const ALL: [Dataset; 8] = [
        Dataset::Ports,
        Dataset::Nuclear,
        Dataset::OilFields,
        Dataset::Pipelines,
        Dataset::Powerlines,
        Dataset::Refineries,
        Dataset::IndustrialZones,
        Dataset::TradeZones,
    ];

    /// File stem of the dataset, also used as its display type.
    pub fn stem(self) -> &'static str {
        match self {
            Dataset::Ports => "ports",
            Dataset::Nuclear => "nuclear",
            Dataset::OilFields => "oil_fields",
            Dataset::Pipelines => "pipelines",
            Dataset::Powerlines => "powerlines",
            Dataset::Refineries => "refineries",
            Dataset::IndustrialZones => "industrial_zones",
            Dataset::TradeZones => "trade_zones",
        }
    }

    pub fn path(self) -> String {
        format!("{}.json", self.stem())
    }

    /// Id shared by the map source and layer of this dataset.
    pub fn layer_id(self) -> String {
        format!("{}-points", self.stem())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

impl FromStr for Dataset {
    type Err = WorldboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase().replace('-', "_");
        Dataset::ALL
            .into_iter()
            .find(|d| d.stem() == s)
            .ok_or_else(|| WorldboardError::NotFound(format!("dataset '{s}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointProperties {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: PointProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Deserialize)]
struct RawLocation {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawPoint {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    coordinates: Option<[f64; 2]>,
    #[serde(default)]
    location: Option<RawLocation>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Turn a dataset document into point features.
///
/// Accepts a flat array of records or an object mapping categories to arrays.
/// Records without usable coordinates are skipped.
pub fn normalize(dataset: Dataset, data: &Value) -> WorldboardResult<FeatureCollection> {
    let records: Vec<&Value> = match data {
        Value::Array(items) => items.iter().collect(),
        Value::Object(categories) => categories
            .values()
            .flat_map(|v| match v {
                Value::Array(items) => items.iter().collect::<Vec<_>>(),
                other => vec![other],
            })
            .collect(),
        _ => {
            return Err(WorldboardError::Parse(format!(
                "{}: expected an array or an object of arrays",
                dataset.path()
            )));
        }
    };

    let mut features = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let raw = match RawPoint::deserialize(record) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(%dataset, index, error = %e, "skipping malformed record");
                continue;
            }
        };

        let coordinates = raw
            .coordinates
            .or_else(|| raw.location.as_ref().map(|l| [l.lng, l.lat]));
        let Some(coordinates) = coordinates else {
            tracing::warn!(%dataset, index, "skipping record without coordinates");
            continue;
        };

        let name = raw.name.unwrap_or_default();
        let description = raw
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("{name} ({dataset})"));

        features.push(Feature {
            geometry: Geometry::Point { coordinates },
            properties: PointProperties {
                kind: raw
                    .kind
                    .filter(|k| !k.is_empty())
                    .unwrap_or_else(|| dataset.stem().to_string()),
                name,
                description,
            },
        });
    }

    Ok(FeatureCollection { features })
}

/// Fetch and normalize one dataset. Touches no map state.
pub async fn load_dataset(source: &DataSource, dataset: Dataset) -> WorldboardResult<FeatureCollection> {
    let data = source.fetch_json(&dataset.path()).await?;
    normalize(dataset, &data)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveOverlay {
    pub dataset: Dataset,
    pub layer_id: String,
    pub feature_count: usize,
}

/// Keeps at most one dataset layer on the map.
#[derive(Debug, Default)]
pub struct OverlayLoader {
    active: Option<ActiveOverlay>,
}

impl OverlayLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveOverlay> {
        self.active.as_ref()
    }

    /// Put `features` on the map as the single active overlay.
    ///
    /// The same dataset again only replaces the source data. A different one
    /// removes the previous layer and source first.
    pub fn install(
        &mut self,
        dataset: Dataset,
        features: FeatureCollection,
        map: &mut dyn MapAdapter,
    ) -> WorldboardResult<&ActiveOverlay> {
        let layer_id = dataset.layer_id();
        let feature_count = features.features.len();
        let data = serde_json::to_value(&features)?;

        if let Some(previous) = &self.active
            && previous.layer_id != layer_id
        {
            map.remove_layer(&previous.layer_id);
            map.remove_source(&previous.layer_id);
        }

        if map.has_source(&layer_id) {
            map.set_source_data(&layer_id, data)?;
        } else {
            map.add_source(&layer_id, data);
        }
        if !map.has_layer(&layer_id) {
            map.add_layer(Layer {
                id: layer_id.clone(),
                source: layer_id.clone(),
                paint: CirclePaint::default(),
            });
        }

        tracing::info!(%dataset, feature_count, "overlay active");
        Ok(self.active.insert(ActiveOverlay {
            dataset,
            layer_id,
            feature_count,
        }))
    }

    /// Install the outcome of [`load_dataset`]. On a failed fetch the map is
    /// left as it was.
    pub fn activate(
        &mut self,
        dataset: Dataset,
        fetched: WorldboardResult<FeatureCollection>,
        map: &mut dyn MapAdapter,
    ) -> WorldboardResult<&ActiveOverlay> {
        let features = fetched.inspect_err(|e| {
            tracing::warn!(%dataset, error = %e, "could not load dataset, keeping current overlay");
        })?;
        self.install(dataset, features, map)
    }

    /// Remove the active overlay, if any.
    pub fn clear(&mut self, map: &mut dyn MapAdapter) {
        if let Some(previous) = self.active.take() {
            map.remove_layer(&previous.layer_id);
            map.remove_source(&previous.layer_id);
        }
    }
}

/// Details card for a clicked point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointInfo {
    pub title: String,
    /// `(LABEL, value)` for every non-empty property except the name.
    pub rows: Vec<(String, String)>,
}

impl PointInfo {
    pub fn from_properties(properties: &serde_json::Map<String, Value>) -> Self {
        let title = properties
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .unwrap_or("Point Information")
            .to_string();

        let rows = properties
            .iter()
            .filter(|(key, _)| key.as_str() != "name")
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::Null | Value::Bool(false) => return None,
                    Value::String(s) if s.is_empty() => return None,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((key.replace('_', " ").to_uppercase(), text))
            })
            .collect();

        PointInfo { title, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapScene;
    use serde_json::json;

    fn source() -> DataSource {
        DataSource::memory([
            (
                "ports.json",
                json!([
                    {"name": "Rotterdam", "coordinates": [4.4, 51.9]},
                    {"name": "Singapore", "location": {"lat": 1.26, "lng": 103.8}, "type": "hub"}
                ]),
            ),
            (
                "oil_fields.json",
                json!({
                    "onshore": [{"name": "Ghawar", "location": {"lat": 25.4, "lng": 49.6}, "description": "Largest"}],
                    "offshore": [{"name": "Safaniya", "location": {"lat": 28.0, "lng": 48.8}}]
                }),
            ),
        ])
    }

    #[test]
    fn normalizes_flat_arrays_with_defaults() {
        let data = json!([
            {"name": "Rotterdam", "coordinates": [4.4, 51.9]},
            {"name": "Nowhere"},
            {"name": "Singapore", "location": {"lat": 1.26, "lng": 103.8}, "type": "hub"}
        ]);
        let fc = normalize(Dataset::Ports, &data).unwrap();

        assert_eq!(fc.features.len(), 2);
        assert_eq!(fc.features[0].properties.kind, "ports");
        assert_eq!(fc.features[0].properties.description, "Rotterdam (ports)");
        assert_eq!(
            fc.features[1].geometry,
            Geometry::Point { coordinates: [103.8, 1.26] }
        );
        assert_eq!(fc.features[1].properties.kind, "hub");
    }

    #[test]
    fn normalizes_category_maps() {
        let data = json!({
            "a": [{"name": "X", "location": {"lat": 1.0, "lng": 2.0}}],
            "b": [{"name": "Y", "location": {"lat": 3.0, "lng": 4.0}}, {"name": "Z", "coordinates": [5.0, 6.0]}]
        });
        let fc = normalize(Dataset::Nuclear, &data).unwrap();
        assert_eq!(fc.features.len(), 3);
    }

    #[test]
    fn rejects_scalar_documents() {
        assert!(normalize(Dataset::Ports, &json!(42)).is_err());
    }

    #[test]
    fn serializes_as_geojson() {
        let fc = normalize(Dataset::Ports, &json!([{"name": "R", "coordinates": [1.0, 2.0]}])).unwrap();
        let value = serde_json::to_value(&fc).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["type"], "Feature");
        assert_eq!(value["features"][0]["geometry"]["type"], "Point");
        assert_eq!(value["features"][0]["properties"]["type"], "ports");
    }

    #[tokio::test]
    async fn only_one_overlay_is_active() {
        let mut loader = OverlayLoader::new();
        let mut map = MapScene::new("dark");
        let source = source();

        loader.activate(Dataset::Ports, load_dataset(&source, Dataset::Ports).await, &mut map).unwrap();
        loader.activate(Dataset::OilFields, load_dataset(&source, Dataset::OilFields).await, &mut map).unwrap();

        assert_eq!(map.layers.len(), 1);
        assert_eq!(map.layers[0].id, "oil_fields-points");
        assert!(!map.has_source("ports-points"));
        assert_eq!(loader.active().map(|a| a.feature_count), Some(2));
    }

    #[tokio::test]
    async fn reactivating_updates_in_place() {
        let mut loader = OverlayLoader::new();
        let mut map = MapScene::new("dark");
        let source = source();

        loader.activate(Dataset::Ports, load_dataset(&source, Dataset::Ports).await, &mut map).unwrap();
        let features = normalize(Dataset::Ports, &json!([{"name": "Only", "coordinates": [0.0, 0.0]}])).unwrap();
        loader.install(Dataset::Ports, features, &mut map).unwrap();

        assert_eq!(map.layers.len(), 1);
        let data = map.source("ports-points").unwrap();
        assert_eq!(data["features"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn failed_fetch_keeps_current_overlay() {
        let mut loader = OverlayLoader::new();
        let mut map = MapScene::new("dark");
        let source = source();

        loader.activate(Dataset::Ports, load_dataset(&source, Dataset::Ports).await, &mut map).unwrap();
        assert!(loader.activate(Dataset::Nuclear, load_dataset(&source, Dataset::Nuclear).await, &mut map).is_err());

        assert_eq!(loader.active().map(|a| a.dataset), Some(Dataset::Ports));
        assert!(map.has_layer("ports-points"));
    }

    #[test]
    fn dataset_names_parse() {
        assert_eq!("oil-fields".parse::<Dataset>().unwrap(), Dataset::OilFields);
        assert_eq!("Trade_Zones".parse::<Dataset>().unwrap(), Dataset::TradeZones);
        assert!("military".parse::<Dataset>().is_err());
    }

    #[test]
    fn point_info_lists_non_empty_properties() {
        let props = json!({"name": "Rotterdam", "type": "ports", "description": "", "max_draft": 24})
            .as_object()
            .cloned()
            .unwrap();
        let info = PointInfo::from_properties(&props);
        assert_eq!(info.title, "Rotterdam");
        assert_eq!(
            info.rows,
            vec![
                ("MAX DRAFT".to_string(), "24".to_string()),
                ("TYPE".to_string(), "ports".to_string())
            ]
        );
    }
}
