//! Token operations.

use crate::api::{urls, ApiRequest};
use crate::errors::HttpError;
use crate::models::{CreateTokenRequest, Token};
use crate::store::{Action, EntityAction};
use crate::AppContext;

use super::perform;

/// GET users/:id/tokens
pub async fn fetch_tokens(ctx: &AppContext, user_id: u64) -> Result<(), HttpError> {
    let request = ApiRequest::get(urls::user_tokens(user_id));
    perform(
        ctx,
        Action::Tokens,
        ctx.client.send::<Vec<Token>>(request),
        |items| {
            let count = items.len() as u64;
            EntityAction::ListSuccess { items, count }
        },
    )
    .await
}

/// POST users/:id/tokens - the response is the only place the secret appears.
pub async fn create_token(
    ctx: &AppContext,
    user_id: u64,
    description: &str,
) -> Result<(), HttpError> {
    let request = async {
        let request = ApiRequest::post(urls::user_tokens(user_id)).json(&CreateTokenRequest {
            description: description.to_string(),
        })?;
        ctx.client.send::<Token>(request).await
    };
    perform(ctx, Action::Tokens, request, EntityAction::Created).await
}
