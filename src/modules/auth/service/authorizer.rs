use async_trait::async_trait;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Identity asserted by a validated bearer token.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub token_use: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(
        rename = "cognito:username",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cognito_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default)]
    pub iss: String,
    #[serde(default)]
    pub exp: u64,
}

impl Claims {
    pub fn username(&self) -> &str {
        self.username
            .as_deref()
            .or(self.cognito_username.as_deref())
            .unwrap_or(&self.sub)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token has expired")]
    Expired,
    #[error("token not accepted: {0}")]
    Forbidden(String),
    #[error("signing keys unavailable: {0}")]
    KeySetUnavailable(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::MissingToken
            | Self::InvalidToken(_)
            | Self::Expired
            | Self::KeySetUnavailable(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn validate(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Accepts any non-empty token. Only wired in development.
pub struct PermissiveAuthorizer;

#[async_trait]
impl Authorizer for PermissiveAuthorizer {
    async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }

        Ok(Claims {
            sub: "anonymous".to_string(),
            token_use: "access".to_string(),
            ..Default::default()
        })
    }
}
