use super::service::{AuthError, Claims};
use crate::types::{Context, MessagePolicy};
use axum::async_trait;
use axum::extract::{Extension, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, RequestPartsExt};
use serde_json::json;
use std::sync::Arc;

fn rejection(err: AuthError) -> Response {
    let status = err.status();
    let message = match status {
        StatusCode::FORBIDDEN => "Forbidden",
        _ => "Unauthorized",
    };

    (status, Json(json!({ "message": message }))).into_response()
}

fn get_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("non-ascii authorization header".into()))?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(AuthError::MissingToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MissingToken);
    }

    match token.trim() {
        "" => Err(AuthError::MissingToken),
        token => Ok(token),
    }
}

async fn get_context(parts: &mut Parts) -> Result<Arc<Context>, Response> {
    parts
        .extract::<Extension<Arc<Context>>>()
        .await
        .map(|Extension(ctx)| ctx)
        .map_err(|err| {
            tracing::error!("Request context is not installed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}

async fn authorize(ctx: &Context, parts: &Parts) -> Result<Claims, Response> {
    let result = match get_bearer_token(&parts.headers) {
        Ok(token) => ctx.auth.authorizer.validate(token).await,
        Err(err) => Err(err),
    };

    result.map_err(|err| {
        tracing::debug!("Denied {} {}: {}", parts.method, parts.uri.path(), err);
        rejection(err)
    })
}

/// Caller authenticated by the configured authorizer. Rejects with 401/403
/// before the handler body or the request body is touched.
#[derive(Clone, Debug)]
pub struct Auth {
    pub claims: Claims,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let ctx = get_context(parts).await?;
        authorize(&ctx, parts)
            .await
            .map(|claims| Self { claims })
    }
}

/// Gate for the message endpoint, which is public or inherits the API-wide
/// authorizer depending on [`MessagePolicy`].
#[derive(Clone, Debug)]
pub struct MessageAuth(pub Option<Claims>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MessageAuth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let ctx = get_context(parts).await?;
        match ctx.auth.message_policy {
            MessagePolicy::Public => Ok(Self(None)),
            MessagePolicy::Inherit => authorize(&ctx, parts).await.map(|claims| Self(Some(claims))),
        }
    }
}
