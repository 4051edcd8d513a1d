//! Subsystem overview model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

/// Summarized health of one hardware/software subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubsystemOverview {
    pub subsystem_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsystem_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_log_time: Option<DateTime<Utc>>,
}

impl Entity for SubsystemOverview {
    type Id = String;
    const NAME: &'static str = "subsystem overview";

    fn id(&self) -> String {
        self.subsystem_name.clone()
    }
}
