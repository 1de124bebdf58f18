use super::{customer, message};
use crate::types::Context;
use axum::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(message::routes::get_router())
        .merge(customer::routes::get_router())
}
