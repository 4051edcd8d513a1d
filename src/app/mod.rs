//! Application shell.
//!
//! Owns the store, the API client and the route table chosen at startup, plus
//! the background settings refresher.

use std::sync::Arc;

use crate::auth::{RefreshSchedule, SessionState, SettingsRefresher};
use crate::config::Config;
use crate::errors::{HttpError, SubmitError};
use crate::routes::RouteTable;
use crate::selectors::select_route;
use crate::storage::ClientStorage;
use crate::store::Action;
use crate::views::{self, create_log, Screen};
use crate::AppContext;

pub struct App {
    ctx: AppContext,
    session: SessionState,
    routes: RouteTable,
    schedule: RefreshSchedule,
    refresher: Option<SettingsRefresher>,
}

impl App {
    /// Build the shell. The session state, and with it the route table, is
    /// fixed for the lifetime of the app.
    pub fn new(config: &Config, storage: Arc<dyn ClientStorage>) -> Result<Self, HttpError> {
        let ctx = AppContext::new(&config.api_url, config.request_timeout, storage)?;
        let session = SessionState::detect(ctx.storage.as_ref());
        tracing::info!("Session state: {:?}", session);

        Ok(Self {
            routes: RouteTable::for_session(session),
            ctx,
            session,
            schedule: config.settings_refresh,
            refresher: None,
        })
    }

    /// Start the background settings refresh. Calling it twice is a no-op.
    pub fn start(&mut self) {
        if self.refresher.as_ref().is_some_and(SettingsRefresher::is_running) {
            return;
        }
        self.refresher = Some(SettingsRefresher::start(
            self.ctx.client.clone(),
            self.ctx.storage.clone(),
            self.schedule,
        ));
    }

    /// Go to `path`: resolve it, load the page's data and render it.
    pub async fn navigate(&self, path: &str) -> Screen {
        let route = self.routes.resolve(path);
        tracing::debug!("Navigating to {} ({})", route.path, route.pattern);
        self.ctx.store.dispatch(Action::Navigate(route.path.clone()));
        route.page.load(&self.ctx).await;
        views::render(&route, &self.ctx)
    }

    /// Submit the create-log form and load the page it leads to.
    pub async fn submit_log(&self) -> Result<Screen, SubmitError> {
        let next = create_log::submit(&self.ctx).await?;
        Ok(self.navigate(next).await)
    }

    /// Render the current route without fetching anything.
    pub fn render(&self) -> Screen {
        let route = self.routes.resolve(&self.current_path());
        views::render(&route, &self.ctx)
    }

    pub fn current_path(&self) -> String {
        self.ctx.store.select(|s| select_route(s).to_string())
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresher.as_ref().is_some_and(SettingsRefresher::is_running)
    }

    pub async fn shutdown(mut self) {
        if let Some(refresher) = self.refresher.take() {
            refresher.stop().await;
        }
    }
}
