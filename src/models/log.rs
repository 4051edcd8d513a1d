//! Log model: a user-authored note, either tied to a run or a threaded comment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attachment, AttachmentCreate, Entity, Run, User};

/// Kind of log entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogSubtype {
    Run,
    Comment,
}

impl LogSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogSubtype::Run => "run",
            LogSubtype::Comment => "comment",
        }
    }
}

/// Who wrote the log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOrigin {
    #[default]
    Human,
    Process,
}

/// A log entry as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub log_id: u64,
    pub subtype: LogSubtype,
    #[serde(default)]
    pub origin: LogOrigin,
    pub creation_time: DateTime<Utc>,
    pub title: String,
    #[serde(default, alias = "body")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_fk_parent_log_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_fk_root_log_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runs: Vec<Run>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Log {
    /// Identifier of the thread this log belongs to; a root log is its own root.
    pub fn thread_root_id(&self) -> u64 {
        self.comment_fk_root_log_id.unwrap_or(self.log_id)
    }

    pub fn is_comment(&self) -> bool {
        self.subtype == LogSubtype::Comment
    }

    /// Author id, from the flat field or the embedded user.
    pub fn author_id(&self) -> Option<u64> {
        self.user_id.or_else(|| self.user.as_ref().map(|u| u.user_id))
    }
}

impl Entity for Log {
    type Id = u64;
    const NAME: &'static str = "log";

    fn id(&self) -> u64 {
        self.log_id
    }
}

/// Request body for creating a run log or a comment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogCreate {
    pub subtype: LogSubtype,
    pub origin: LogOrigin,
    pub title: String,
    #[serde(rename = "body", alias = "text")]
    pub text: String,
    /// Author
    pub user: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentCreate>,
}

/// Request body for linking a run to an existing log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkRunToLogRequest {
    pub run_number: u64,
}
