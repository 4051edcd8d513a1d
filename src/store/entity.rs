//! Generic per-entity state and its reducer.

use serde::Serialize;

use crate::errors::HttpError;
use crate::models::Entity;

/// State of one entity store.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityState<T> {
    /// True only while a request is outstanding
    pub is_fetching: bool,
    pub list: Vec<T>,
    /// Total count reported by the server for the last list fetch
    pub count: u64,
    pub current: Option<T>,
    /// Error of the most recent failed request
    pub error: Option<HttpError>,
}

impl<T> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            is_fetching: false,
            list: Vec::new(),
            count: 0,
            current: None,
            error: None,
        }
    }
}

/// Transitions an entity store goes through.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityAction<T> {
    /// A request was dispatched
    Request,
    /// A list fetch resolved
    ListSuccess { items: Vec<T>, count: u64 },
    /// A single-entity fetch resolved
    OneSuccess(T),
    /// A create resolved with the new entity
    Created(T),
    /// An update resolved with the new version of the entity
    Updated(T),
    /// A request failed
    Failure(HttpError),
    /// Forget the current entity
    ClearCurrent,
}

impl<T: Entity> EntityState<T> {
    pub fn reduce(&mut self, action: EntityAction<T>) {
        match action {
            EntityAction::Request => {
                self.is_fetching = true;
            }
            EntityAction::ListSuccess { items, count } => {
                self.is_fetching = false;
                self.error = None;
                self.list = items;
                self.count = count;
            }
            EntityAction::OneSuccess(item) => {
                self.is_fetching = false;
                self.error = None;
                self.current = Some(item);
            }
            EntityAction::Created(item) => {
                self.is_fetching = false;
                self.error = None;
                self.list.push(item.clone());
                self.count += 1;
                self.current = Some(item);
            }
            EntityAction::Updated(item) => {
                self.is_fetching = false;
                self.error = None;
                let id = item.id();
                if let Some(existing) = self.list.iter_mut().find(|e| e.id() == id) {
                    *existing = item.clone();
                }
                if self.current.as_ref().is_some_and(|c| c.id() == id) {
                    self.current = Some(item);
                }
            }
            EntityAction::Failure(error) => {
                self.is_fetching = false;
                self.error = Some(error);
            }
            EntityAction::ClearCurrent => {
                self.current = None;
            }
        }
    }

    pub fn find(&self, id: &T::Id) -> Option<&T> {
        self.list.iter().find(|e| &e.id() == id)
    }
}
