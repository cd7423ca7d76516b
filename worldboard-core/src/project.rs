//! Named projects and the active-project mode.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::constants::PROJECTS_KEY;
use crate::error::{WorldboardError, WorldboardResult};
use crate::store::{KeyValueStore, save_json, try_load_json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Older entries have no id; one is assigned when they are loaded.
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Creation time, epoch milliseconds.
    pub created: i64,
    #[serde(default)]
    pub layers: Vec<Value>,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

impl Project {
    pub fn created_date(&self) -> Option<NaiveDate> {
        DateTime::<Utc>::from_timestamp_millis(self.created).map(|dt| dt.date_naive())
    }
}

fn project_name(name: &str) -> WorldboardResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(WorldboardError::Validation("Project name is required.".into()));
    }
    Ok(name.to_string())
}

pub struct ProjectBook {
    projects: Vec<Project>,
    active: Option<String>,
    store: Arc<dyn KeyValueStore>,
}

impl ProjectBook {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut book = ProjectBook {
            projects: Vec::new(),
            active: None,
            store,
        };
        book.reload();
        book
    }

    /// Re-read the stored projects so writes from other sessions are kept.
    /// Entries without an id get one and are written back.
    pub fn reload(&mut self) {
        let Some(mut projects) = try_load_json::<Vec<Project>>(self.store.as_ref(), PROJECTS_KEY) else {
            return;
        };

        let mut assigned = 0;
        for project in projects.iter_mut().filter(|p| p.id.is_empty()) {
            project.id = Uuid::new_v4().to_string();
            assigned += 1;
        }

        self.projects = projects;
        if assigned > 0 {
            tracing::info!(assigned, "assigned ids to stored projects");
            self.save();
        }
        if self.active().is_none() {
            self.active = None;
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn active(&self) -> Option<&Project> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    /// The project toolbox is shown while a project is open.
    pub fn toolbox_visible(&self) -> bool {
        self.active.is_some()
    }

    /// Create a project and open it.
    pub fn create(&mut self, name: &str) -> WorldboardResult<&Project> {
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: project_name(name)?,
            created: Utc::now().timestamp_millis(),
            layers: Vec::new(),
            settings: Map::new(),
        };
        let id = project.id.clone();
        self.reload();
        self.projects.push(project);
        self.save();
        self.open(&id)
    }

    pub fn open(&mut self, id: &str) -> WorldboardResult<&Project> {
        let index = self.index_of(id)?;
        self.active = Some(id.to_string());
        Ok(&self.projects[index])
    }

    /// Leave project mode. Returns false if no project was open.
    pub fn close(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn rename(&mut self, id: &str, name: &str) -> WorldboardResult<&Project> {
        let name = project_name(name)?;
        self.reload();
        let index = self.index_of(id)?;
        self.projects[index].name = name;
        self.save();
        Ok(&self.projects[index])
    }

    pub fn delete(&mut self, id: &str) -> WorldboardResult<Project> {
        self.reload();
        let index = self.index_of(id)?;
        let removed = self.projects.remove(index);
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        self.save();
        Ok(removed)
    }

    fn index_of(&self, id: &str) -> WorldboardResult<usize> {
        self.projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| WorldboardError::NotFound(format!("project '{id}'")))
    }

    fn save(&self) {
        save_json(self.store.as_ref(), PROJECTS_KEY, &self.projects);
    }
}
