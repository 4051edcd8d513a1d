//! Log operations, including the draft being edited.

use crate::api::{urls, ApiRequest};
use crate::errors::HttpError;
use crate::models::{LinkRunToLogRequest, ListQuery, ListResponse, Log, LogCreate, LogDraft};
use crate::store::{Action, DraftAction, EntityAction};
use crate::AppContext;

use super::perform;

/// GET logs - replace the log list.
pub async fn fetch_logs(ctx: &AppContext, query: &ListQuery) -> Result<(), HttpError> {
    let request = ApiRequest::get(urls::logs()).query(query);
    perform(
        ctx,
        Action::Logs,
        ctx.client.send::<ListResponse<Log>>(request),
        |page| EntityAction::ListSuccess {
            items: page.data,
            count: page.count,
        },
    )
    .await
}

/// GET logs/:id - load the current log.
pub async fn fetch_log(ctx: &AppContext, log_id: u64) -> Result<(), HttpError> {
    let request = ApiRequest::get(urls::log(log_id));
    perform(
        ctx,
        Action::Logs,
        ctx.client.send::<Log>(request),
        EntityAction::OneSuccess,
    )
    .await
}

/// POST logs - create a run log or a comment.
///
/// On success the new log is appended and the draft is cleared; on failure the
/// draft is left untouched so the user can retry.
pub async fn create_log(ctx: &AppContext, payload: &LogCreate) -> Result<(), HttpError> {
    let request = async {
        let request = ApiRequest::post(urls::logs()).json(payload)?;
        ctx.client.send::<Log>(request).await
    };
    perform(ctx, Action::Logs, request, EntityAction::Created).await?;

    tracing::info!("Created {} log '{}'", payload.subtype.as_str(), payload.title);
    clear_log_draft(ctx);
    Ok(())
}

/// PATCH logs/:id/runs - link a run to an existing log.
pub async fn link_run_to_log(
    ctx: &AppContext,
    log_id: u64,
    run_number: u64,
) -> Result<(), HttpError> {
    let request = async {
        let request =
            ApiRequest::patch(urls::log_runs(log_id)).json(&LinkRunToLogRequest { run_number })?;
        ctx.client.send::<Log>(request).await
    };
    perform(ctx, Action::Logs, request, EntityAction::Updated).await
}

pub fn set_log_draft(ctx: &AppContext, draft: LogDraft) {
    ctx.store.dispatch(Action::Draft(DraftAction::Set(draft)));
}

pub fn clear_log_draft(ctx: &AppContext) {
    ctx.store.dispatch(Action::Draft(DraftAction::Clear));
}
