//! Authentication settings served by the `setting` endpoint.

use serde::{Deserialize, Serialize};

/// Settings the login page needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthSettings {
    #[serde(rename = "USE_CERN_SSO")]
    pub use_cern_sso: bool,
    #[serde(rename = "AUTH_URL")]
    pub auth_url: String,
}

/// The endpoint answers either with the bare settings or wrapped in `data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SettingsResponse {
    Wrapped { data: AuthSettings },
    Bare(AuthSettings),
}

impl SettingsResponse {
    pub fn into_settings(self) -> AuthSettings {
        match self {
            SettingsResponse::Wrapped { data } => data,
            SettingsResponse::Bare(settings) => settings,
        }
    }
}
