//! The persisted collection of calendar events.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::calendar::event::{CalendarEvent, EventDraft, Hour};
use crate::constants::CALENDAR_EVENTS_KEY;
use crate::error::{WorldboardError, WorldboardResult};
use crate::store::{KeyValueStore, load_json, save_json, try_load_json};

/// Calendar events, written back to the store wholesale after every mutation.
pub struct EventBook {
    events: Vec<CalendarEvent>,
    store: Arc<dyn KeyValueStore>,
}

impl EventBook {
    /// Load events from the store. Missing or corrupt data gives an empty book.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let events = load_json(store.as_ref(), CALENDAR_EVENTS_KEY);
        EventBook { events, store }
    }

    /// Re-read the stored collection so writes from other sessions are kept.
    /// An unreadable store leaves the in-memory copy in place.
    pub fn reload(&mut self) {
        if let Some(events) = try_load_json(self.store.as_ref(), CALENDAR_EVENTS_KEY) {
            self.events = events;
        }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events in a week-grid cell, in insertion order.
    pub fn at(&self, date: NaiveDate, hour: Option<Hour>) -> impl Iterator<Item = &CalendarEvent> {
        self.events
            .iter()
            .filter(move |e| e.date == date && e.hour == hour)
    }

    /// Every event on a day, scheduled or not.
    pub fn on(&self, date: NaiveDate) -> impl Iterator<Item = &CalendarEvent> {
        self.events.iter().filter(move |e| e.date == date)
    }

    /// Validate the draft, append a new event with a fresh id and persist.
    pub fn create(&mut self, draft: &EventDraft) -> WorldboardResult<&CalendarEvent> {
        let valid = draft.validate()?;
        let event = CalendarEvent::from_draft(Uuid::new_v4().to_string(), valid);
        self.reload();

        tracing::debug!(id = %event.id, title = %event.title, "creating calendar event");
        self.events.push(event);
        self.save();

        Ok(&self.events[self.events.len() - 1])
    }

    /// Validate the draft and overwrite the event with the given id in place.
    pub fn update(&mut self, id: &str, draft: &EventDraft) -> WorldboardResult<&CalendarEvent> {
        let valid = draft.validate()?;
        self.reload();
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| WorldboardError::NotFound(format!("event {id}")))?;

        self.events[index].apply(valid);
        self.save();

        Ok(&self.events[index])
    }

    /// Remove the event with the given id. Returns the removed event.
    pub fn delete(&mut self, id: &str) -> WorldboardResult<CalendarEvent> {
        self.reload();
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| WorldboardError::NotFound(format!("event {id}")))?;

        let removed = self.events.remove(index);
        self.save();

        Ok(removed)
    }

    fn save(&self) {
        save_json(self.store.as_ref(), CALENDAR_EVENTS_KEY, &self.events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::store::tests::BrokenStore;

    fn standup() -> EventDraft {
        EventDraft {
            title: "Standup".into(),
            calendar: "default".into(),
            date: "2024-03-04".into(),
            hour: "9".into(),
            ..EventDraft::default()
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn create_persists_and_is_found_in_its_cell() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut book = EventBook::load(store.clone());

        let id = book.create(&standup()).unwrap().id.clone();

        let cell: Vec<_> = book.at(date("2024-03-04"), Hour::new(9)).collect();
        assert_eq!(cell.len(), 1);
        assert_eq!(cell[0].title, "Standup");

        let reloaded = EventBook::load(store);
        assert_eq!(reloaded.get(&id).map(|e| e.title.as_str()), Some("Standup"));
    }

    #[test]
    fn ids_are_unique_under_rapid_creation() {
        let mut book = EventBook::load(Arc::new(MemoryStore::new()));
        let a = book.create(&standup()).unwrap().id.clone();
        let b = book.create(&standup()).unwrap().id.clone();
        assert_ne!(a, b);
        assert_eq!(book.at(date("2024-03-04"), Hour::new(9)).count(), 2);
    }

    #[test]
    fn invalid_draft_leaves_collection_unchanged() {
        let mut book = EventBook::load(Arc::new(MemoryStore::new()));
        let mut draft = standup();
        draft.title = String::new();

        assert!(book.create(&draft).is_err());
        assert!(book.is_empty());
    }

    #[test]
    fn update_mutates_in_place() {
        let mut book = EventBook::load(Arc::new(MemoryStore::new()));
        let id = book.create(&standup()).unwrap().id.clone();

        let mut edit = standup();
        edit.title = "Retro".into();
        edit.hour = String::new();
        book.update(&id, &edit).unwrap();

        assert_eq!(book.len(), 1);
        let event = book.get(&id).unwrap();
        assert_eq!(event.title, "Retro");
        assert_eq!(event.hour, None);
    }

    #[test]
    fn delete_removes_the_event_and_its_chip() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut book = EventBook::load(store.clone());
        let id = book.create(&standup()).unwrap().id.clone();

        book.delete(&id).unwrap();

        assert_eq!(book.at(date("2024-03-04"), Hour::new(9)).count(), 0);
        assert!(EventBook::load(store).is_empty());
        assert!(matches!(book.delete(&id), Err(WorldboardError::NotFound(_))));
    }

    #[test]
    fn broken_store_degrades_to_in_memory_book() {
        let mut book = EventBook::load(Arc::new(BrokenStore));
        assert!(book.is_empty());

        book.create(&standup()).unwrap();
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn writers_sharing_a_store_keep_each_others_events() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut server = EventBook::load(store.clone());
        let mut cli = EventBook::load(store.clone());

        let mut from_cli = standup();
        from_cli.title = "FromCli".into();
        cli.create(&from_cli).unwrap();

        let mut from_server = standup();
        from_server.title = "FromServer".into();
        server.create(&from_server).unwrap();

        let titles: Vec<_> = EventBook::load(store).events().iter().map(|e| e.title.clone()).collect();
        assert_eq!(titles, ["FromCli", "FromServer"]);
        assert_eq!(server.len(), 2);
    }

    #[test]
    fn broken_store_keeps_every_in_memory_event() {
        let mut book = EventBook::load(Arc::new(BrokenStore));
        book.create(&standup()).unwrap();
        book.create(&standup()).unwrap();
        assert_eq!(book.len(), 2);
    }
}
