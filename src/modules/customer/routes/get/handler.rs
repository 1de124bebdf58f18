use super::service::service;
use super::types::{request, response};
use crate::{modules::auth::middleware::Auth, types::Context};
use axum::extract::{rejection::QueryRejection, Path, Query, State};
use std::sync::Arc;

pub async fn handler(
    _: Auth,
    State(ctx): State<Arc<Context>>,
    Path(id): Path<String>,
    params: Result<Query<request::Params>, QueryRejection>,
) -> response::Response {
    let Query(params) = params?;

    service(
        ctx,
        request::Payload {
            id,
            name: params.name,
        },
    )
    .await
}
