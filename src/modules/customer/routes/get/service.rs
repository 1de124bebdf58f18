use super::types::{request, response};
use crate::{modules::customer::repository, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    repository::find_by_id(
        ctx.storage.client.as_ref(),
        &ctx.storage.customer_table,
        payload.id,
        payload.name,
    )
    .await
    .map_err(response::Error::Store)?
    .ok_or(response::Error::NotFound)
    .map(response::Success::Customer)
}
