//! The create-log form: a run log or a comment in an existing thread.

use std::path::Path;

use crate::errors::{HttpError, SubmitError};
use crate::models::{AttachmentCreate, LogDraft};
use crate::operations::{clear_log_draft, create_log, fetch_log, fetch_profile, set_log_draft};
use crate::selectors::{select_current_log, select_log_draft, select_profile_user_id};
use crate::store::{Action, DraftAction};
use crate::AppContext;

/// Where the submitted log goes once created.
pub const AFTER_SUBMIT_PATH: &str = "/logs";

/// What the form is creating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateLogTarget {
    /// A top-level log, optionally with the run already known from the route
    Run(Option<u64>),
    /// A comment on the log with this id
    Comment { parent_id: u64 },
}

/// Reset the draft for `target`.
///
/// For a comment the parent is fetched first so the draft can join its thread;
/// if that fails no draft is set and the error is returned. A missing profile
/// is fetched as well, but failing that only lands in the error log: `submit`
/// retries it.
pub async fn init(ctx: &AppContext, target: CreateLogTarget) -> Result<(), HttpError> {
    clear_log_draft(ctx);

    match target {
        CreateLogTarget::Run(run_number) => set_log_draft(ctx, LogDraft::for_run(run_number)),
        CreateLogTarget::Comment { parent_id } => {
            fetch_log(ctx, parent_id).await?;
            let draft = ctx.store.select(|s| {
                select_current_log(s)
                    .filter(|parent| parent.log_id == parent_id)
                    .map(LogDraft::comment_on)
            });
            if let Some(draft) = draft {
                set_log_draft(ctx, draft);
            }
        }
    }

    if ctx.store.select(select_profile_user_id).is_none() {
        let _ = fetch_profile(ctx).await;
    }
    Ok(())
}

pub fn set_title(ctx: &AppContext, title: &str) {
    ctx.store.dispatch(Action::Draft(DraftAction::SetTitle(title.to_string())));
}

pub fn set_text(ctx: &AppContext, text: &str) {
    ctx.store.dispatch(Action::Draft(DraftAction::SetText(text.to_string())));
}

/// Ignored for comments.
pub fn set_run_number(ctx: &AppContext, run_number: Option<u64>) {
    ctx.store.dispatch(Action::Draft(DraftAction::SetRunNumber(run_number)));
}

pub fn add_attachment(ctx: &AppContext, attachment: AttachmentCreate) {
    ctx.store.dispatch(Action::Draft(DraftAction::AddAttachment(attachment)));
}

/// Read a file from disk and add it to the draft.
pub async fn attach_file(ctx: &AppContext, path: &Path) -> std::io::Result<()> {
    let attachment = AttachmentCreate::from_path(path).await?;
    tracing::debug!("Attaching {} ({} bytes)", attachment.file_name, attachment.file_size);
    add_attachment(ctx, attachment);
    Ok(())
}

/// Post the draft, authored by the signed-in user, and move the route to the
/// log list. Returns the path to load next.
///
/// On any failure the draft stays as it is so the user can retry.
pub async fn submit(ctx: &AppContext) -> Result<&'static str, SubmitError> {
    let draft = ctx
        .store
        .select(|s| select_log_draft(s).cloned())
        .ok_or(SubmitError::NoDraft)?;

    let user_id = match ctx.store.select(select_profile_user_id) {
        Some(user_id) => user_id,
        None => {
            fetch_profile(ctx).await?;
            ctx.store
                .select(select_profile_user_id)
                .ok_or(SubmitError::NotAuthenticated)?
        }
    };

    let payload = draft.to_payload(user_id)?;
    create_log(ctx, &payload).await?;

    ctx.store.dispatch(Action::Navigate(AFTER_SUBMIT_PATH.to_string()));
    Ok(AFTER_SUBMIT_PATH)
}
