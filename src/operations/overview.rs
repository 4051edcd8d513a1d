//! Subsystem overview operations.

use crate::api::{urls, ApiRequest};
use crate::errors::HttpError;
use crate::models::SubsystemOverview;
use crate::store::{Action, EntityAction};
use crate::AppContext;

use super::perform;

/// GET overview - public, sent without credentials.
pub async fn fetch_subsystem_overviews(ctx: &AppContext) -> Result<(), HttpError> {
    let request = ApiRequest::get(urls::overview()).without_credentials();
    perform(
        ctx,
        Action::Overviews,
        ctx.client.send::<Vec<SubsystemOverview>>(request),
        |items| {
            let count = items.len() as u64;
            EntityAction::ListSuccess { items, count }
        },
    )
    .await
}
