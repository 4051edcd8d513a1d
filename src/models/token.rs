//! API token model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

/// A credential a user issued for scripted access.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(alias = "id")]
    pub token_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default, alias = "tokenDescription")]
    pub description: String,
    /// The secret itself; only returned when the token is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Entity for Token {
    type Id = u64;
    const NAME: &'static str = "token";

    fn id(&self) -> u64 {
        self.token_id
    }
}

/// Request body for issuing a new token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    pub description: String,
}
