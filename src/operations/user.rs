//! User and profile operations.

use crate::api::{urls, ApiRequest};
use crate::errors::HttpError;
use crate::models::{ListQuery, ListResponse, Log, Profile, User};
use crate::store::{Action, EntityAction};
use crate::AppContext;

use super::perform;

/// GET users/:id
pub async fn fetch_user(ctx: &AppContext, user_id: u64) -> Result<(), HttpError> {
    let request = ApiRequest::get(urls::user(user_id));
    perform(
        ctx,
        Action::Users,
        ctx.client.send::<User>(request),
        EntityAction::OneSuccess,
    )
    .await
}

/// GET users/:id/logs
pub async fn fetch_user_logs(
    ctx: &AppContext,
    user_id: u64,
    query: &ListQuery,
) -> Result<(), HttpError> {
    let request = ApiRequest::get(urls::user_logs(user_id)).query(query);
    perform(
        ctx,
        Action::UserLogs,
        ctx.client.send::<ListResponse<Log>>(request),
        |page| EntityAction::ListSuccess {
            items: page.data,
            count: page.count,
        },
    )
    .await
}

/// GET user/profile - the signed-in user.
pub async fn fetch_profile(ctx: &AppContext) -> Result<(), HttpError> {
    let request = ApiRequest::get(urls::profile());
    perform(
        ctx,
        Action::Profile,
        ctx.client.send::<Profile>(request),
        EntityAction::OneSuccess,
    )
    .await
}
