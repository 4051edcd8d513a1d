//! Operations: async calls against the API that drive the store.
//!
//! Every operation follows the same shape: dispatch a request action, await
//! the HTTP call, then dispatch success or failure. Failures are also appended
//! to the session error log and handed back to the caller, which may ignore
//! them.

mod attachment;
mod log;
mod overview;
mod run;
mod token;
mod user;

pub use attachment::*;
pub use log::*;
pub use overview::*;
pub use run::*;
pub use token::*;
pub use user::*;

use std::future::Future;

use uuid::Uuid;

use crate::errors::HttpError;
use crate::models::Entity;
use crate::store::{Action, EntityAction, ErrorAction};
use crate::AppContext;

/// Run `request` against the entity store selected by `slot`.
///
/// The store's `is_fetching` flag is set before the request is awaited and
/// cleared by whichever action resolves it.
pub(crate) async fn perform<T, R, F>(
    ctx: &AppContext,
    slot: fn(EntityAction<T>) -> Action,
    request: F,
    on_success: impl FnOnce(R) -> EntityAction<T>,
) -> Result<(), HttpError>
where
    T: Entity,
    F: Future<Output = Result<R, HttpError>>,
{
    ctx.store.dispatch(slot(EntityAction::Request));

    match request.await {
        Ok(response) => {
            ctx.store.dispatch(slot(on_success(response)));
            Ok(())
        }
        Err(error) => {
            tracing::warn!("{} request failed: {}", T::NAME, error);
            ctx.store.dispatch(slot(EntityAction::Failure(error.clone())));
            ctx.store.dispatch(Action::Errors(ErrorAction::Add(error.clone())));
            Err(error)
        }
    }
}

/// Remove one entry from the error banner.
pub fn dismiss_error(ctx: &AppContext, id: Uuid) {
    ctx.store.dispatch(Action::Errors(ErrorAction::Dismiss(id)));
}

pub fn clear_errors(ctx: &AppContext) {
    ctx.store.dispatch(Action::Errors(ErrorAction::Clear));
}
