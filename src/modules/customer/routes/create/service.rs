use super::types::{request, response};
use crate::{modules::customer::repository, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    repository::create(
        ctx.storage.client.as_ref(),
        &ctx.storage.customer_table,
        repository::CreateCustomerPayload {
            id: payload.id,
            name: payload.name,
        },
    )
    .await
    .map_err(response::Error::Store)
    .map(response::Success::Created)
}
