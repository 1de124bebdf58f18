use crate::{modules::auth::middleware::MessageAuth, types::Context};
use axum::{extract::Json, http::StatusCode, response::IntoResponse, routing::get, Router};
use serde_json::json;
use std::sync::Arc;

async fn get_message(_: MessageAuth) -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "message": "Hello" })))
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/api/v1/message", get(get_message))
}
