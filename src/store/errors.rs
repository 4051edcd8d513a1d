//! The session-wide error log rendered as a dismissible banner.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::HttpError;

/// One recorded failure.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub id: Uuid,
    pub error: HttpError,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum ErrorAction {
    Add(HttpError),
    Dismiss(Uuid),
    Clear,
}

/// Errors recorded during this session, oldest first.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ErrorLog {
    pub records: Vec<ErrorRecord>,
}

impl ErrorLog {
    pub fn reduce(&mut self, action: ErrorAction) {
        match action {
            ErrorAction::Add(error) => self.records.push(ErrorRecord {
                id: Uuid::new_v4(),
                error,
                recorded_at: Utc::now(),
            }),
            ErrorAction::Dismiss(id) => self.records.retain(|r| r.id != id),
            ErrorAction::Clear => self.records.clear(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
