//! Jiskefet logbook client core.
//!
//! A typed REST client for the logbook API, a reducer-driven store of runs,
//! logs, users, subsystem overviews, tokens and attachments, the selectors and
//! async operations views use to read and drive it, and the session-dependent
//! route tables.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod errors;
pub mod models;
pub mod operations;
pub mod routes;
pub mod selectors;
pub mod storage;
pub mod store;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use api::ApiClient;
use errors::HttpError;
use storage::ClientStorage;
use store::Store;

/// What operations and views need: the API, the state and client storage.
#[derive(Clone)]
pub struct AppContext {
    pub client: ApiClient,
    pub store: Store,
    pub storage: Arc<dyn ClientStorage>,
}

impl AppContext {
    pub fn new(
        api_url: &str,
        timeout: Duration,
        storage: Arc<dyn ClientStorage>,
    ) -> Result<Self, HttpError> {
        Ok(Self {
            client: ApiClient::new(api_url, timeout, storage.clone())?,
            store: Store::default(),
            storage,
        })
    }
}

#[cfg(test)]
mod tests;
