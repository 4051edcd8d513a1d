//! User and profile models.

use serde::{Deserialize, Serialize};

use super::Entity;

/// A logbook user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "id")]
    pub user_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sams_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Role/permission flags granted to this user
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl Entity for User {
    type Id = u64;
    const NAME: &'static str = "user";

    fn id(&self) -> u64 {
        self.user_id
    }
}

/// Display data the identity provider reports for the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// The signed-in user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_data: User,
    #[serde(default)]
    pub profile_data: ProfileData,
}

impl Entity for Profile {
    type Id = u64;
    const NAME: &'static str = "profile";

    fn id(&self) -> u64 {
        self.user_data.user_id
    }
}
