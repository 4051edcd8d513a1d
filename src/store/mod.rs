//! Client-side state container.
//!
//! Actions flow through a single reducer into [`RootState`]. The [`Store`] is
//! an explicit handle passed to views and operations; there is no global
//! instance. Every dispatch bumps a version that subscribers can watch.

mod entity;
mod errors;

pub use entity::*;
pub use errors::*;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::watch;

use crate::models::{
    Attachment, AttachmentCreate, Log, LogDraft, Profile, Run, SubsystemOverview, Token, User,
};

/// Edits to the in-progress log draft.
#[derive(Debug, Clone)]
pub enum DraftAction {
    Set(LogDraft),
    SetTitle(String),
    SetText(String),
    SetRunNumber(Option<u64>),
    AddAttachment(AttachmentCreate),
    Clear,
}

/// Everything the store can be told.
#[derive(Debug, Clone)]
pub enum Action {
    Runs(EntityAction<Run>),
    Logs(EntityAction<Log>),
    Users(EntityAction<User>),
    UserLogs(EntityAction<Log>),
    Overviews(EntityAction<SubsystemOverview>),
    Tokens(EntityAction<Token>),
    Attachments(EntityAction<Attachment>),
    Profile(EntityAction<Profile>),
    Draft(DraftAction),
    Errors(ErrorAction),
    Navigate(String),
}

/// The whole client state.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RootState {
    pub runs: EntityState<Run>,
    pub logs: EntityState<Log>,
    pub users: EntityState<User>,
    /// Logs written by the user shown on the profile page
    pub user_logs: EntityState<Log>,
    pub overviews: EntityState<SubsystemOverview>,
    pub tokens: EntityState<Token>,
    pub attachments: EntityState<Attachment>,
    pub profile: EntityState<Profile>,
    pub draft: Option<LogDraft>,
    pub errors: ErrorLog,
    /// Path of the page being shown
    pub route: String,
}

impl Default for RootState {
    fn default() -> Self {
        Self {
            runs: EntityState::default(),
            logs: EntityState::default(),
            users: EntityState::default(),
            user_logs: EntityState::default(),
            overviews: EntityState::default(),
            tokens: EntityState::default(),
            attachments: EntityState::default(),
            profile: EntityState::default(),
            draft: None,
            errors: ErrorLog::default(),
            route: "/".to_string(),
        }
    }
}

impl RootState {
    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::Runs(a) => self.runs.reduce(a),
            Action::Logs(a) => self.logs.reduce(a),
            Action::Users(a) => self.users.reduce(a),
            Action::UserLogs(a) => self.user_logs.reduce(a),
            Action::Overviews(a) => self.overviews.reduce(a),
            Action::Tokens(a) => self.tokens.reduce(a),
            Action::Attachments(a) => self.attachments.reduce(a),
            Action::Profile(a) => self.profile.reduce(a),
            Action::Draft(a) => self.reduce_draft(a),
            Action::Errors(a) => self.errors.reduce(a),
            Action::Navigate(path) => self.route = path,
        }
    }

    fn reduce_draft(&mut self, action: DraftAction) {
        match action {
            DraftAction::Set(draft) => self.draft = Some(draft),
            DraftAction::Clear => self.draft = None,
            // Field edits without a draft have nothing to apply to
            DraftAction::SetTitle(title) => {
                if let Some(draft) = &mut self.draft {
                    draft.set_title(title);
                }
            }
            DraftAction::SetText(text) => {
                if let Some(draft) = &mut self.draft {
                    draft.set_text(text);
                }
            }
            DraftAction::SetRunNumber(run_number) => {
                if let Some(draft) = &mut self.draft {
                    draft.set_run_number(run_number);
                }
            }
            DraftAction::AddAttachment(attachment) => {
                if let Some(draft) = &mut self.draft {
                    draft.add_attachment(attachment);
                }
            }
        }
    }
}

/// Shared handle to the client state.
#[derive(Debug, Clone)]
pub struct Store {
    state: Arc<Mutex<RootState>>,
    version: Arc<watch::Sender<u64>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(RootState::default())
    }
}

impl Store {
    pub fn new(initial: RootState) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(initial)),
            version: Arc::new(version),
        }
    }

    /// Apply `action` and notify subscribers.
    pub fn dispatch(&self, action: Action) {
        tracing::trace!("dispatch {:?}", action);
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.reduce(action);
        }
        self.version.send_modify(|v| *v += 1);
    }

    /// Read a projection of the current state.
    pub fn select<R>(&self, selector: impl FnOnce(&RootState) -> R) -> R {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        selector(&state)
    }

    pub fn snapshot(&self) -> RootState {
        self.select(RootState::clone)
    }

    /// Receiver that changes every time an action is dispatched.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }
}
