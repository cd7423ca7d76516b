//! The dashboard: every piece of state in one place, changed only through
//! the operations below.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::calendar::{CalendarAction, CalendarHtml, CalendarList, CalendarModule, CalendarPopup, Point};
use crate::command::{self, Command};
use crate::config::WorldboardConfig;
use crate::constants::{FLAT_MIN_ZOOM, WORLD_BOUNDS};
use crate::country::{CountryCatalog, CountryFeature, CountrySelection};
use crate::data::DataSource;
use crate::error::{WorldboardError, WorldboardResult};
use crate::leadership::{Leadership, LeadershipCatalog, LeadershipView};
use crate::map::{MapAdapter, MapScene, Projection};
use crate::overlay::{self, ActiveOverlay, Dataset, FeatureCollection, OverlayLoader, PointInfo};
use crate::project::{Project, ProjectBook};
use crate::settings::Settings;
use crate::store::KeyValueStore;
use crate::ui::{Key, Layer, LayerStack, LoadingGate};

pub struct Dashboard {
    dark_style: String,
    satellite_style: String,
    source: DataSource,
    map: MapScene,
    calendar: CalendarModule,
    projects: ProjectBook,
    catalog: CountryCatalog,
    selection: CountrySelection,
    leadership: LeadershipCatalog,
    leadership_view: Option<LeadershipView>,
    overlays: OverlayLoader,
    point_info: Option<PointInfo>,
    settings: Settings,
    layers: LayerStack,
    loading: LoadingGate,
}

/// A palette command with the data it needs already fetched.
///
/// Fetching borrows only the [`DataSource`], so a caller sharing the
/// dashboard behind a lock can fetch first and lock only to apply.
#[derive(Debug)]
pub struct PreparedCommand {
    command: Command,
    features: Option<WorldboardResult<FeatureCollection>>,
}

impl PreparedCommand {
    pub async fn fetch(command: Command, source: &DataSource) -> Self {
        let features = match command {
            Command::Overlay(dataset) => Some(overlay::load_dataset(source, dataset).await),
            _ => None,
        };
        PreparedCommand { command, features }
    }

    pub fn command(&self) -> Command {
        self.command
    }
}

/// Everything a front-end needs to draw the current state.
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub loading: bool,
    pub map: &'a MapScene,
    pub layers: &'a [Layer],
    pub labels_visible: bool,
    pub overlay: Option<&'a ActiveOverlay>,
    pub point_info: Option<&'a PointInfo>,
    pub country: &'a CountrySelection,
    pub leadership: Option<&'a LeadershipView>,
    pub projects: &'a [Project],
    pub active_project: Option<&'a Project>,
    pub project_toolbox: bool,
    /// Present while the calendar overlay is open.
    pub calendar: Option<CalendarHtml>,
    pub calendar_popup: Option<&'a CalendarPopup>,
}

impl Dashboard {
    pub fn new(
        config: &WorldboardConfig,
        store: Arc<dyn KeyValueStore>,
        source: DataSource,
        today: NaiveDate,
    ) -> Self {
        let mut map = MapScene::new(&config.dark_style);
        let settings = Settings::load(store.clone());
        settings.apply(&mut map);

        Dashboard {
            dark_style: config.dark_style.clone(),
            satellite_style: config.satellite_style.clone(),
            source,
            map,
            calendar: CalendarModule::new(store.clone(), CalendarList::default(), today),
            projects: ProjectBook::load(store),
            catalog: CountryCatalog::default(),
            selection: CountrySelection::default(),
            leadership: LeadershipCatalog::default(),
            leadership_view: None,
            overlays: OverlayLoader::new(),
            point_info: None,
            settings,
            layers: LayerStack::new(),
            loading: LoadingGate::new(),
        }
    }

    /// Load the country tables and hide the loading overlay.
    pub async fn init(&mut self) {
        let catalog = CountryCatalog::load(&self.source).await;
        self.install_catalog(catalog);
    }

    /// Second half of [`Dashboard::init`] for callers that fetched the
    /// catalog themselves.
    pub fn install_catalog(&mut self, catalog: CountryCatalog) {
        self.catalog = catalog;
        self.settings.apply(&mut self.map);
        self.loading.dismiss();
        tracing::info!(countries = self.catalog.len(), "dashboard ready");
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn map(&self) -> &MapScene {
        &self.map
    }

    pub fn calendar(&self) -> &CalendarModule {
        &self.calendar
    }

    pub fn projects(&self) -> &ProjectBook {
        &self.projects
    }

    pub fn catalog(&self) -> &CountryCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &CountrySelection {
        &self.selection
    }

    pub fn overlays(&self) -> &OverlayLoader {
        &self.overlays
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn leadership_view(&self) -> Option<&LeadershipView> {
        self.leadership_view.as_ref()
    }

    pub fn point_info(&self) -> Option<&PointInfo> {
        self.point_info.as_ref()
    }

    pub fn loading(&self) -> &LoadingGate {
        &self.loading
    }

    pub fn snapshot(&self, today: NaiveDate) -> DashboardSnapshot<'_> {
        let calendar_open = self.layers.is_open(Layer::Calendar);
        DashboardSnapshot {
            loading: !self.loading.is_dismissed(),
            map: &self.map,
            layers: self.layers.layers(),
            labels_visible: self.settings.labels_visible(),
            overlay: self.overlays.active(),
            point_info: self.point_info.as_ref(),
            country: &self.selection,
            leadership: self.leadership_view.as_ref(),
            projects: self.projects.projects(),
            active_project: self.projects.active(),
            project_toolbox: self.projects.toolbox_visible(),
            calendar: calendar_open.then(|| self.calendar.render(today)),
            calendar_popup: if calendar_open { self.calendar.popup() } else { None },
        }
    }

    // Command palette

    /// Run an entered palette line. Unknown input does nothing.
    pub async fn run_command(&mut self, input: &str) -> WorldboardResult<Option<Command>> {
        let Some(command) = command::parse(input) else {
            tracing::debug!(input, "ignoring unknown command");
            return Ok(None);
        };
        self.execute(command).await?;
        Ok(Some(command))
    }

    pub async fn execute(&mut self, command: Command) -> WorldboardResult<()> {
        let prepared = PreparedCommand::fetch(command, &self.source).await;
        self.apply_command(prepared)
    }

    pub fn apply_command(&mut self, prepared: PreparedCommand) -> WorldboardResult<()> {
        let PreparedCommand { command, features } = prepared;
        tracing::debug!(%command, "executing command");
        match command {
            Command::Overlay(dataset) => {
                let fetched = features.ok_or_else(|| {
                    WorldboardError::Validation(format!("{command} was applied before its data was fetched"))
                })?;
                self.install_overlay(dataset, fetched)?;
            }
            Command::Satellite => {
                let style = self.satellite_style.clone();
                self.set_style(&style);
            }
            Command::SatelliteOff => {
                let style = self.dark_style.clone();
                self.set_style(&style);
            }
            Command::Flat => {
                self.map.set_projection(Projection::Mercator);
                self.map.set_min_zoom(Some(FLAT_MIN_ZOOM));
                self.map.set_max_bounds(Some(WORLD_BOUNDS));
            }
            Command::Globe => self.map.set_projection(Projection::Globe),
            Command::Projects => self.layers.open(Layer::ProjectsSidebar),
        }
        Ok(())
    }

    pub fn install_overlay(
        &mut self,
        dataset: Dataset,
        fetched: WorldboardResult<FeatureCollection>,
    ) -> WorldboardResult<&ActiveOverlay> {
        self.overlays.activate(dataset, fetched, &mut self.map)
    }

    /// Switch the map style. Label visibility is reapplied on the new style.
    pub fn set_style(&mut self, url: &str) {
        self.map.set_style(url);
        self.settings.apply(&mut self.map);
    }

    // Keyboard

    /// Returns true when the key changed something.
    pub fn key(&mut self, key: Key) -> bool {
        match key {
            Key::F2 => {
                self.open_calendar();
                true
            }
            Key::Escape => self.escape(),
        }
    }

    fn escape(&mut self) -> bool {
        if self.layers.top() == Some(Layer::Calendar) && self.calendar.close_popup() {
            return true;
        }
        match self.layers.pop() {
            Some(layer) => {
                self.on_closed(layer);
                true
            }
            None => false,
        }
    }

    fn on_closed(&mut self, layer: Layer) {
        match layer {
            Layer::Calendar => {
                self.calendar.close_popup();
            }
            Layer::CountryPanel => {
                self.selection.close_panel();
            }
            Layer::ContextMenu => {
                self.selection.close_context_menu();
            }
            Layer::Leadership => self.leadership_view = None,
            Layer::PointInfo => self.point_info = None,
            Layer::ProjectsSidebar | Layer::ProjectModal | Layer::Settings => {}
        }
    }

    /// Close one layer with its side effects.
    pub fn close(&mut self, layer: Layer) -> bool {
        let closed = self.layers.close(layer);
        if closed {
            self.on_closed(layer);
        }
        closed
    }

    // Calendar

    pub fn open_calendar(&mut self) {
        self.calendar.reload();
        self.layers.open(Layer::Calendar);
    }

    pub fn calendar_action(&mut self, action: CalendarAction, today: NaiveDate) -> WorldboardResult<()> {
        self.calendar.dispatch(action, today)
    }

    // Countries

    pub fn select_country(&mut self, feature: &CountryFeature) {
        self.layers.close(Layer::ContextMenu);
        self.layers.close(Layer::CountryPanel);
        self.selection.select(feature, &self.catalog, &mut self.map);
    }

    /// Info button.
    pub fn open_country_panel(&mut self) -> bool {
        let opened = self.selection.open_panel();
        if opened {
            self.layers.open(Layer::CountryPanel);
        }
        opened
    }

    pub fn country_context_menu(&mut self, feature: CountryFeature, position: Point) {
        self.selection.open_context_menu(feature, position);
        self.layers.open(Layer::ContextMenu);
    }

    pub fn choose_country_info(&mut self) -> bool {
        self.layers.close(Layer::ContextMenu);
        let opened = self.selection.choose_info(&self.catalog, &mut self.map);
        if opened {
            self.layers.open(Layer::CountryPanel);
        }
        opened
    }

    /// Click on empty map.
    pub fn clear_country(&mut self) {
        self.selection.clear(&mut self.map);
        self.layers.close(Layer::CountryPanel);
        self.layers.close(Layer::ContextMenu);
    }

    /// Open the leadership chart for the selected country, loading the data
    /// on first use.
    pub async fn open_leadership(&mut self) -> &LeadershipView {
        let fetched = if self.leadership.is_loaded() {
            None
        } else {
            Some(LeadershipCatalog::fetch(&self.source).await)
        };
        self.show_leadership(fetched)
    }

    pub fn leadership_loaded(&self) -> bool {
        self.leadership.is_loaded()
    }

    /// Open the chart with data fetched by the caller. `None` means the data
    /// was already loaded.
    pub fn show_leadership(
        &mut self,
        fetched: Option<WorldboardResult<HashMap<String, Leadership>>>,
    ) -> &LeadershipView {
        if let Some(fetched) = fetched {
            // A failed load is logged by the catalog and shown as a message.
            let _ = self.leadership.accept(fetched);
        }
        let view = self.leadership.view(self.selection.last_selected());
        self.layers.open(Layer::Leadership);
        self.leadership_view.insert(view)
    }

    // Overlay points

    /// Click on an overlay point. `None` closes the card.
    pub fn show_point(&mut self, properties: Option<&Map<String, Value>>) -> Option<&PointInfo> {
        match properties {
            Some(props) => {
                self.layers.open(Layer::PointInfo);
                Some(self.point_info.insert(PointInfo::from_properties(props)))
            }
            None => {
                self.close(Layer::PointInfo);
                None
            }
        }
    }

    pub fn clear_overlay(&mut self) {
        self.overlays.clear(&mut self.map);
        self.close(Layer::PointInfo);
    }

    // Projects

    pub fn open_projects_sidebar(&mut self) {
        self.layers.open(Layer::ProjectsSidebar);
    }

    pub fn open_project_modal(&mut self) {
        self.layers.open(Layer::ProjectModal);
    }

    /// Submit the new-project modal. The modal stays open on a bad name.
    pub fn create_project(&mut self, name: &str) -> WorldboardResult<Project> {
        let project = self.projects.create(name)?.clone();
        self.layers.close(Layer::ProjectModal);
        Ok(project)
    }

    pub fn open_project(&mut self, id: &str) -> WorldboardResult<Project> {
        Ok(self.projects.open(id)?.clone())
    }

    pub fn close_project(&mut self) -> bool {
        self.projects.close()
    }

    pub fn rename_project(&mut self, id: &str, name: &str) -> WorldboardResult<Project> {
        Ok(self.projects.rename(id, name)?.clone())
    }

    pub fn delete_project(&mut self, id: &str) -> WorldboardResult<Project> {
        self.projects.delete(id)
    }

    // Settings

    pub fn open_settings(&mut self) {
        self.layers.open(Layer::Settings);
    }

    pub fn set_labels_visible(&mut self, visible: bool) {
        self.settings.set_labels_visible(visible, &mut self.map);
    }
}
