//! Session bootstrap.
//!
//! Decides once, at startup, whether the user is signed in (a session token is
//! persisted) and keeps the login settings fresh with a cancellable periodic
//! refresh.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveTime, TimeZone, Timelike};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::{urls, ApiClient, ApiRequest};
use crate::errors::{HttpError, StorageError};
use crate::models::{AuthSettings, SettingsResponse};
use crate::storage::{ClientStorage, AUTH_URL_KEY, TOKEN_KEY, USE_CERN_SSO_KEY};

/// Which route table is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Authenticated,
    LockedOut,
}

impl SessionState {
    /// Signed in means: a non-empty token is persisted.
    pub fn detect(storage: &dyn ClientStorage) -> Self {
        match storage.get(TOKEN_KEY) {
            Some(token) if !token.trim().is_empty() => SessionState::Authenticated,
            _ => SessionState::LockedOut,
        }
    }
}

pub fn store_session_token(storage: &dyn ClientStorage, token: &str) -> Result<(), StorageError> {
    storage.set(TOKEN_KEY, token.trim())
}

pub fn sign_out(storage: &dyn ClientStorage) -> Result<(), StorageError> {
    storage.remove(TOKEN_KEY)
}

/// Auth settings last written to storage, if any.
pub fn stored_auth_settings(storage: &dyn ClientStorage) -> Option<AuthSettings> {
    Some(AuthSettings {
        use_cern_sso: storage.get(USE_CERN_SSO_KEY)? == "true",
        auth_url: storage.get(AUTH_URL_KEY)?,
    })
}

/// GET setting
pub async fn fetch_auth_settings(client: &ApiClient) -> Result<AuthSettings, HttpError> {
    let request = ApiRequest::get(urls::setting()).without_credentials();
    let response: SettingsResponse = client.send(request).await?;
    Ok(response.into_settings())
}

pub fn persist_auth_settings(
    storage: &dyn ClientStorage,
    settings: &AuthSettings,
) -> Result<(), StorageError> {
    storage.set(USE_CERN_SSO_KEY, if settings.use_cern_sso { "true" } else { "false" })?;
    storage.set(AUTH_URL_KEY, &settings.auth_url)
}

/// Fetch and persist the auth settings.
///
/// Failures are logged and swallowed; stale settings stay in place.
pub async fn refresh_auth_settings(
    client: &ApiClient,
    storage: &dyn ClientStorage,
) -> Option<AuthSettings> {
    let settings = match fetch_auth_settings(client).await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Failed to refresh auth settings: {}", e);
            return None;
        }
    };
    if let Err(e) = persist_auth_settings(storage, &settings) {
        tracing::warn!("Failed to store auth settings: {}", e);
        return None;
    }
    tracing::debug!("Auth settings refreshed (sso: {})", settings.use_cern_sso);
    Some(settings)
}

/// When the settings refresh runs after the initial one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSchedule {
    /// Once a day at this local time
    Daily { hour: u32, minute: u32 },
    /// At a fixed interval
    Every(Duration),
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        RefreshSchedule::Daily { hour: 2, minute: 0 }
    }
}

impl RefreshSchedule {
    /// Parse `HH:MM` into a daily schedule.
    pub fn parse_daily(raw: &str) -> Option<Self> {
        let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()?;
        Some(RefreshSchedule::Daily {
            hour: time.hour(),
            minute: time.minute(),
        })
    }

    /// Time to wait from `now` until the next run.
    pub fn delay_from<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration {
        match *self {
            RefreshSchedule::Every(interval) => interval,
            RefreshSchedule::Daily { hour, minute } => {
                let now = now.naive_local();
                let Some(at) = NaiveTime::from_hms_opt(hour, minute, 0) else {
                    return Duration::from_secs(24 * 60 * 60);
                };
                let mut next = now.date().and_time(at);
                if next <= now {
                    next += chrono::Duration::days(1);
                }
                (next - now).to_std().unwrap_or(Duration::from_secs(24 * 60 * 60))
            }
        }
    }
}

/// Background task refreshing auth settings: immediately, then on schedule.
#[derive(Debug)]
pub struct SettingsRefresher {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SettingsRefresher {
    /// Spawn the refresh loop on the current tokio runtime.
    pub fn start(
        client: ApiClient,
        storage: Arc<dyn ClientStorage>,
        schedule: RefreshSchedule,
    ) -> Self {
        let (shutdown, mut stop) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            refresh_auth_settings(&client, storage.as_ref()).await;
            loop {
                let delay = schedule.delay_from(&Local::now());
                tracing::debug!("Next auth settings refresh in {:?}", delay);
                tokio::select! {
                    _ = &mut stop => break,
                    _ = tokio::time::sleep(delay) => {
                        refresh_auth_settings(&client, storage.as_ref()).await;
                    }
                }
            }
            tracing::debug!("Auth settings refresher stopped");
        });

        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the loop and wait for it to exit.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Auth settings refresher ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for SettingsRefresher {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::Utc;

    #[test]
    fn test_detect_session() {
        assert_eq!(
            SessionState::detect(&MemoryStorage::new()),
            SessionState::LockedOut
        );
        assert_eq!(
            SessionState::detect(&MemoryStorage::with_token("  ")),
            SessionState::LockedOut
        );
        assert_eq!(
            SessionState::detect(&MemoryStorage::with_token("jwt")),
            SessionState::Authenticated
        );
    }

    #[test]
    fn test_sign_in_and_out() {
        let storage = MemoryStorage::new();
        store_session_token(&storage, " jwt ").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("jwt"));
        sign_out(&storage).unwrap();
        assert_eq!(SessionState::detect(&storage), SessionState::LockedOut);
    }

    #[test]
    fn test_persist_and_read_settings() {
        let storage = MemoryStorage::new();
        assert!(stored_auth_settings(&storage).is_none());

        let settings = AuthSettings {
            use_cern_sso: true,
            auth_url: "https://oauth.web.cern.ch".to_string(),
        };
        persist_auth_settings(&storage, &settings).unwrap();
        assert_eq!(storage.get(USE_CERN_SSO_KEY).as_deref(), Some("true"));
        assert_eq!(stored_auth_settings(&storage), Some(settings));
    }

    #[test]
    fn test_parse_daily() {
        assert_eq!(
            RefreshSchedule::parse_daily("02:00"),
            Some(RefreshSchedule::Daily { hour: 2, minute: 0 })
        );
        assert_eq!(
            RefreshSchedule::parse_daily("23:45"),
            Some(RefreshSchedule::Daily { hour: 23, minute: 45 })
        );
        assert_eq!(RefreshSchedule::parse_daily("25:00"), None);
        assert_eq!(RefreshSchedule::parse_daily("soon"), None);
    }

    #[test]
    fn test_daily_delay_before_and_after() {
        let schedule = RefreshSchedule::default();

        let before = Utc.with_ymd_and_hms(2018, 10, 1, 1, 30, 0).unwrap();
        assert_eq!(schedule.delay_from(&before), Duration::from_secs(30 * 60));

        let after = Utc.with_ymd_and_hms(2018, 10, 1, 3, 0, 0).unwrap();
        assert_eq!(schedule.delay_from(&after), Duration::from_secs(23 * 60 * 60));

        let exactly = Utc.with_ymd_and_hms(2018, 10, 1, 2, 0, 0).unwrap();
        assert_eq!(schedule.delay_from(&exactly), Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn test_interval_delay() {
        let schedule = RefreshSchedule::Every(Duration::from_millis(50));
        assert_eq!(schedule.delay_from(&Utc::now()), Duration::from_millis(50));
    }
}
