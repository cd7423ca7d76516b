//! Persisted user settings applied to the map.

use std::sync::Arc;

use crate::constants::LABELS_KEY;
use crate::map::MapAdapter;
use crate::store::{KeyValueStore, load_json, save_json};

/// User settings. Only map label visibility so far.
pub struct Settings {
    labels_visible: bool,
    store: Arc<dyn KeyValueStore>,
}

/// Missing entry means labels on.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
struct LabelsFlag(bool);

impl Default for LabelsFlag {
    fn default() -> Self {
        LabelsFlag(true)
    }
}

impl Settings {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let LabelsFlag(labels_visible) = load_json(store.as_ref(), LABELS_KEY);
        Settings { labels_visible, store }
    }

    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    pub fn set_labels_visible(&mut self, visible: bool, map: &mut dyn MapAdapter) {
        self.labels_visible = visible;
        save_json(self.store.as_ref(), LABELS_KEY, &LabelsFlag(visible));
        self.apply(map);
    }

    /// Push the stored preference to the map. Needed after every style change.
    pub fn apply(&self, map: &mut dyn MapAdapter) {
        map.set_labels_visible(self.labels_visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapScene;
    use crate::store::MemoryStore;

    #[test]
    fn labels_default_on() {
        let settings = Settings::load(Arc::new(MemoryStore::new()));
        assert!(settings.labels_visible());
    }

    #[test]
    fn legacy_string_flag_loads() {
        let store = Arc::new(MemoryStore::new());
        store.set(LABELS_KEY, "false").unwrap();
        assert!(!Settings::load(store).labels_visible());
    }

    #[test]
    fn toggle_persists_and_applies() {
        let store = Arc::new(MemoryStore::new());
        let mut map = MapScene::new("dark");
        let mut settings = Settings::load(store.clone());

        settings.set_labels_visible(false, &mut map);
        assert!(!map.labels_visible);
        assert_eq!(store.get(LABELS_KEY).unwrap().as_deref(), Some("false"));

        map.set_style("satellite");
        map.set_labels_visible(true);
        Settings::load(store).apply(&mut map);
        assert!(!map.labels_visible);
    }
}
