//! Country selection: the highlighted border, the info panel and its
//! cached leader and military data.

mod iso;

pub use iso::iso2_for;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value, json};

use crate::calendar::Point;
use crate::constants::{COUNTRY_HIGHLIGHT_LAYER, PLACEHOLDER_IMG};
use crate::data::DataSource;
use crate::map::MapAdapter;

pub const COUNTRY_INFO_PATH: &str = "country-info.json";
pub const COUNTRY_MILITARY_PATH: &str = "country-military.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    #[serde(default)]
    pub leader: Option<String>,
    #[serde(default, rename = "leaderImg")]
    pub leader_img: Option<String>,
    #[serde(default)]
    pub party: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilitaryStats {
    #[serde(default)]
    pub active_personnel: Option<Number>,
    #[serde(default)]
    pub reserve_personnel: Option<Number>,
    #[serde(default)]
    pub total_aircraft: Option<Number>,
    #[serde(default)]
    pub total_tanks: Option<Number>,
}

impl MilitaryStats {
    /// Labelled rows, `N/A` for missing values.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let show = |n: &Option<Number>| n.as_ref().map_or_else(|| "N/A".to_string(), Number::to_string);
        vec![
            ("Active Personnel", show(&self.active_personnel)),
            ("Reserve Personnel", show(&self.reserve_personnel)),
            ("Total Aircraft", show(&self.total_aircraft)),
            ("Total Tanks", show(&self.total_tanks)),
        ]
    }
}

/// Country metadata keyed by ISO3.
#[derive(Debug, Clone, Default)]
pub struct CountryCatalog {
    info: HashMap<String, CountryInfo>,
    military: HashMap<String, MilitaryStats>,
}

impl CountryCatalog {
    pub fn new(info: HashMap<String, CountryInfo>, military: HashMap<String, MilitaryStats>) -> Self {
        CountryCatalog { info, military }
    }

    /// Fetch both tables concurrently. A table that fails to load is empty.
    pub async fn load(source: &DataSource) -> Self {
        let (info, military) = tokio::join!(
            source.fetch_json(COUNTRY_INFO_PATH),
            source.fetch_json(COUNTRY_MILITARY_PATH)
        );

        CountryCatalog {
            info: table(COUNTRY_INFO_PATH, info),
            military: table(COUNTRY_MILITARY_PATH, military),
        }
    }

    pub fn info(&self, iso3: &str) -> Option<&CountryInfo> {
        self.info.get(iso3)
    }

    pub fn military(&self, iso3: &str) -> Option<&MilitaryStats> {
        self.military.get(iso3)
    }

    pub fn len(&self) -> usize {
        self.info.len()
    }

    pub fn is_empty(&self) -> bool {
        self.info.is_empty() && self.military.is_empty()
    }
}

fn table<T: serde::de::DeserializeOwned>(
    path: &str,
    fetched: crate::error::WorldboardResult<Value>,
) -> HashMap<String, T> {
    let parsed = fetched.and_then(|value| serde_json::from_value(value).map_err(Into::into));
    parsed.unwrap_or_else(|e| {
        tracing::warn!(path, error = %e, "country data unavailable");
        HashMap::new()
    })
}

/// The properties of a clicked country feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryFeature {
    #[serde(rename = "iso_3166_1_alpha_3")]
    pub iso3: String,
    #[serde(rename = "name_en")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryPanel {
    pub iso3: String,
    pub title: String,
    pub flag_url: Option<String>,
    pub leader_name: String,
    pub leader_img: String,
    pub party_line: String,
    /// The leadership button only makes sense when a leader is known.
    pub leader_button_visible: bool,
    pub military: Option<Vec<(&'static str, String)>>,
}

impl CountryPanel {
    pub fn build(feature: &CountryFeature, catalog: &CountryCatalog) -> Self {
        let leader = catalog
            .info(&feature.iso3)
            .filter(|i| i.leader.as_deref().is_some_and(|l| !l.is_empty()));

        let (leader_name, leader_img, party) = match leader {
            Some(info) => (
                info.leader.clone().unwrap_or_default(),
                info.leader_img
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| PLACEHOLDER_IMG.to_string()),
                info.party.clone().filter(|s| !s.is_empty()),
            ),
            None => ("No data".to_string(), PLACEHOLDER_IMG.to_string(), None),
        };

        CountryPanel {
            iso3: feature.iso3.clone(),
            title: feature.name.clone(),
            flag_url: flag_url(&feature.iso3),
            leader_name,
            leader_img,
            party_line: format!("Political party: {}", party.as_deref().unwrap_or("Unknown")),
            leader_button_visible: leader.is_some(),
            military: catalog.military(&feature.iso3).map(MilitaryStats::rows),
        }
    }
}

pub fn flag_url(iso3: &str) -> Option<String> {
    iso2_for(iso3).map(|iso2| format!("https://flagcdn.com/w320/{iso2}.png"))
}

/// Highlight filter matching one country, or nothing for an empty code.
pub fn highlight_filter(iso3: &str) -> Value {
    json!(["==", ["get", "iso_3166_1_alpha_3"], iso3])
}

/// Right-click menu on a country. It has a single "Info" item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextMenu {
    pub position: Point,
    pub feature: CountryFeature,
    pub items: Vec<&'static str>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CountrySelection {
    last_selected: Option<String>,
    panel: Option<CountryPanel>,
    panel_open: bool,
    info_button_visible: bool,
    context_menu: Option<ContextMenu>,
}

impl CountrySelection {
    pub fn last_selected(&self) -> Option<&str> {
        self.last_selected.as_deref()
    }

    pub fn panel(&self) -> Option<&CountryPanel> {
        self.panel.as_ref()
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn info_button_visible(&self) -> bool {
        self.info_button_visible
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    /// Left click on a country: highlight it, fill the panel and reveal the
    /// info button. The panel itself stays closed.
    pub fn select(&mut self, feature: &CountryFeature, catalog: &CountryCatalog, map: &mut dyn MapAdapter) {
        self.last_selected = Some(feature.iso3.clone());
        map.set_filter(COUNTRY_HIGHLIGHT_LAYER, Some(highlight_filter(&feature.iso3)));
        self.panel = Some(CountryPanel::build(feature, catalog));
        self.panel_open = false;
        self.info_button_visible = true;
        self.context_menu = None;
        tracing::debug!(iso3 = %feature.iso3, "country selected");
    }

    /// Info button click.
    pub fn open_panel(&mut self) -> bool {
        if self.panel.is_none() {
            return false;
        }
        self.panel_open = true;
        self.info_button_visible = false;
        true
    }

    pub fn open_context_menu(&mut self, feature: CountryFeature, position: Point) {
        self.context_menu = Some(ContextMenu {
            position,
            feature,
            items: vec!["Info"],
        });
    }

    pub fn close_context_menu(&mut self) -> bool {
        self.context_menu.take().is_some()
    }

    /// "Info" in the context menu: select the country and open its panel.
    pub fn choose_info(&mut self, catalog: &CountryCatalog, map: &mut dyn MapAdapter) -> bool {
        let Some(menu) = self.context_menu.take() else {
            return false;
        };
        self.select(&menu.feature, catalog, map);
        self.open_panel()
    }

    /// Close the panel without touching the highlight. Used by Escape.
    pub fn close_panel(&mut self) -> bool {
        let was_open = self.panel_open;
        self.panel_open = false;
        if was_open {
            self.last_selected = None;
        }
        was_open
    }

    /// Click on the map background.
    pub fn clear(&mut self, map: &mut dyn MapAdapter) {
        self.last_selected = None;
        self.panel_open = false;
        self.info_button_visible = false;
        self.context_menu = None;
        map.set_filter(COUNTRY_HIGHLIGHT_LAYER, Some(highlight_filter("")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapScene;

    fn france() -> CountryFeature {
        CountryFeature {
            iso3: "FRA".into(),
            name: "France".into(),
        }
    }

    fn catalog() -> CountryCatalog {
        let mut info = HashMap::new();
        info.insert(
            "FRA".to_string(),
            CountryInfo {
                leader: Some("Jane Doe".into()),
                leader_img: None,
                party: None,
            },
        );
        let mut military = HashMap::new();
        military.insert(
            "FRA".to_string(),
            MilitaryStats {
                active_personnel: Some(Number::from(200_000)),
                ..MilitaryStats::default()
            },
        );
        CountryCatalog::new(info, military)
    }

    #[test]
    fn panel_for_known_leader() {
        let panel = CountryPanel::build(&france(), &catalog());
        assert_eq!(panel.title, "France");
        assert_eq!(panel.flag_url.as_deref(), Some("https://flagcdn.com/w320/fr.png"));
        assert_eq!(panel.leader_name, "Jane Doe");
        assert_eq!(panel.leader_img, PLACEHOLDER_IMG);
        assert_eq!(panel.party_line, "Political party: Unknown");
        assert!(panel.leader_button_visible);

        let military = panel.military.unwrap();
        assert_eq!(military[0], ("Active Personnel", "200000".to_string()));
        assert_eq!(military[3], ("Total Tanks", "N/A".to_string()));
    }

    #[test]
    fn panel_without_data_is_not_an_error() {
        let feature = CountryFeature {
            iso3: "ATA".into(),
            name: "Antarctica".into(),
        };
        let panel = CountryPanel::build(&feature, &catalog());
        assert_eq!(panel.leader_name, "No data");
        assert!(!panel.leader_button_visible);
        assert_eq!(panel.flag_url, None);
        assert_eq!(panel.military, None);
    }

    #[test]
    fn select_then_clear_resets_highlight() {
        let mut selection = CountrySelection::default();
        let mut map = MapScene::new("dark");

        selection.select(&france(), &catalog(), &mut map);
        assert_eq!(selection.last_selected(), Some("FRA"));
        assert!(selection.info_button_visible());
        assert!(!selection.is_panel_open());
        assert_eq!(map.filter(COUNTRY_HIGHLIGHT_LAYER), Some(&highlight_filter("FRA")));

        selection.clear(&mut map);
        assert_eq!(selection.last_selected(), None);
        assert_eq!(map.filter(COUNTRY_HIGHLIGHT_LAYER), Some(&highlight_filter("")));
    }

    #[test]
    fn context_menu_info_opens_panel() {
        let mut selection = CountrySelection::default();
        let mut map = MapScene::new("dark");

        selection.open_context_menu(france(), Point { x: 5.0, y: 5.0 });
        assert_eq!(selection.context_menu().map(|m| m.items.clone()), Some(vec!["Info"]));

        assert!(selection.choose_info(&catalog(), &mut map));
        assert!(selection.is_panel_open());
        assert!(selection.context_menu().is_none());
        assert_eq!(selection.last_selected(), Some("FRA"));
    }

    #[tokio::test]
    async fn catalog_degrades_to_empty_tables() {
        let source = DataSource::memory([(
            COUNTRY_INFO_PATH,
            json!({"FRA": {"leader": "Jane Doe", "party": "X"}}),
        )]);
        let catalog = CountryCatalog::load(&source).await;
        assert_eq!(catalog.len(), 1);
        assert!(catalog.military("FRA").is_none());
        assert_eq!(catalog.info("FRA").and_then(|i| i.party.as_deref()), Some("X"));
    }

    #[test]
    fn feature_properties_deserialize() {
        let feature: CountryFeature =
            serde_json::from_value(json!({"iso_3166_1_alpha_3": "DEU", "name_en": "Germany", "extra": 1}))
                .unwrap();
        assert_eq!(feature.iso3, "DEU");
    }
}
