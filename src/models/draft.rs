//! In-progress log drafts.
//!
//! Whether a draft becomes a run log or a comment is fixed when the draft is
//! constructed, never inferred from which fields happen to be filled in.

use serde::{Deserialize, Serialize};

use super::{AttachmentCreate, Log, LogCreate, LogOrigin, LogSubtype};
use crate::errors::SubmitError;

/// Draft of a top-level log tied to a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RunLogDraft {
    pub title: String,
    pub text: String,
    /// Filled from the route, or typed in by the user
    pub run_number: Option<u64>,
    #[serde(default)]
    pub attachments: Vec<AttachmentCreate>,
}

/// Draft of a comment in an existing thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentLogDraft {
    pub title: String,
    pub text: String,
    pub parent_id: u64,
    pub root_id: u64,
    #[serde(default)]
    pub attachments: Vec<AttachmentCreate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LogDraft {
    Run(RunLogDraft),
    Comment(CommentLogDraft),
}

impl LogDraft {
    pub fn for_run(run_number: Option<u64>) -> Self {
        LogDraft::Run(RunLogDraft {
            run_number,
            ..RunLogDraft::default()
        })
    }

    /// Start a comment on `parent`, joining the parent's thread.
    pub fn comment_on(parent: &Log) -> Self {
        LogDraft::Comment(CommentLogDraft {
            title: format!("Re: {}", parent.title),
            text: String::new(),
            parent_id: parent.log_id,
            root_id: parent.thread_root_id(),
            attachments: Vec::new(),
        })
    }

    pub fn subtype(&self) -> LogSubtype {
        match self {
            LogDraft::Run(_) => LogSubtype::Run,
            LogDraft::Comment(_) => LogSubtype::Comment,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            LogDraft::Run(d) => &d.title,
            LogDraft::Comment(d) => &d.title,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            LogDraft::Run(d) => &d.text,
            LogDraft::Comment(d) => &d.text,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        match self {
            LogDraft::Run(d) => d.title = title.into(),
            LogDraft::Comment(d) => d.title = title.into(),
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        match self {
            LogDraft::Run(d) => d.text = text.into(),
            LogDraft::Comment(d) => d.text = text.into(),
        }
    }

    /// Returns false for comments, which never reference a run.
    pub fn set_run_number(&mut self, run_number: Option<u64>) -> bool {
        match self {
            LogDraft::Run(d) => {
                d.run_number = run_number;
                true
            }
            LogDraft::Comment(_) => false,
        }
    }

    pub fn add_attachment(&mut self, attachment: AttachmentCreate) {
        match self {
            LogDraft::Run(d) => d.attachments.push(attachment),
            LogDraft::Comment(d) => d.attachments.push(attachment),
        }
    }

    pub fn attachments(&self) -> &[AttachmentCreate] {
        match self {
            LogDraft::Run(d) => &d.attachments,
            LogDraft::Comment(d) => &d.attachments,
        }
    }

    /// Build the create payload authored by `user_id`.
    pub fn to_payload(&self, user_id: u64) -> Result<LogCreate, SubmitError> {
        if self.title().trim().is_empty() {
            return Err(SubmitError::MissingTitle);
        }
        let (run, parent_id, root_id) = match self {
            LogDraft::Run(d) => {
                let run = d.run_number.ok_or(SubmitError::MissingRunNumber)?;
                (Some(run), None, None)
            }
            LogDraft::Comment(d) => (None, Some(d.parent_id), Some(d.root_id)),
        };
        Ok(LogCreate {
            subtype: self.subtype(),
            origin: LogOrigin::Human,
            title: self.title().to_string(),
            text: self.text().to_string(),
            user: user_id,
            run,
            parent_id,
            root_id,
            attachments: self.attachments().to_vec(),
        })
    }
}
