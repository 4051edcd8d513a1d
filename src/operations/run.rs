//! Run operations.

use crate::api::{urls, ApiRequest};
use crate::errors::HttpError;
use crate::models::{LinkLogToRunRequest, ListQuery, ListResponse, Run};
use crate::store::{Action, EntityAction};
use crate::AppContext;

use super::perform;

/// GET runs - replace the run list.
pub async fn fetch_runs(ctx: &AppContext, query: &ListQuery) -> Result<(), HttpError> {
    let request = ApiRequest::get(urls::runs()).query(query);
    perform(
        ctx,
        Action::Runs,
        ctx.client.send::<ListResponse<Run>>(request),
        |page| EntityAction::ListSuccess {
            items: page.data,
            count: page.count,
        },
    )
    .await
}

/// GET runs/:id - load the current run.
pub async fn fetch_run(ctx: &AppContext, run_number: u64) -> Result<(), HttpError> {
    let request = ApiRequest::get(urls::run(run_number));
    perform(
        ctx,
        Action::Runs,
        ctx.client.send::<Run>(request),
        EntityAction::OneSuccess,
    )
    .await
}

/// PATCH runs/:id - link an existing log to a run.
pub async fn link_log_to_run(
    ctx: &AppContext,
    log_id: u64,
    run_number: u64,
) -> Result<(), HttpError> {
    let request = async {
        let request =
            ApiRequest::patch(urls::run(run_number)).json(&LinkLogToRunRequest { log_id })?;
        ctx.client.send::<Run>(request).await
    };
    perform(ctx, Action::Runs, request, EntityAction::Updated).await
}
