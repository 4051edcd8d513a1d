//! Attachment operations.

use crate::api::{urls, ApiRequest};
use crate::errors::HttpError;
use crate::models::{Attachment, AttachmentCreate};
use crate::store::{Action, EntityAction};
use crate::AppContext;

use super::perform;

/// GET logs/:id/attachments
pub async fn fetch_attachments(ctx: &AppContext, log_id: u64) -> Result<(), HttpError> {
    let request = ApiRequest::get(urls::log_attachments(log_id));
    perform(
        ctx,
        Action::Attachments,
        ctx.client.send::<Vec<Attachment>>(request),
        |items| {
            let count = items.len() as u64;
            EntityAction::ListSuccess { items, count }
        },
    )
    .await
}

/// POST attachments - attach a file to an existing log.
pub async fn upload_attachment(
    ctx: &AppContext,
    log_id: u64,
    upload: AttachmentCreate,
) -> Result<(), HttpError> {
    let upload = upload.for_log(log_id);
    let request = async {
        let request = ApiRequest::post(urls::attachments()).json(&upload)?;
        ctx.client.send::<Attachment>(request).await
    };
    perform(ctx, Action::Attachments, request, EntityAction::Created).await
}
