use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header, errors::ErrorKind, jwk::JwkSet, Algorithm, DecodingKey, Validation,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

use super::authorizer::{AuthError, Authorizer, Claims};

const TOKEN_USES: [&str; 2] = ["id", "access"];
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const REFETCH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Default)]
struct KeyCache {
    keys: Option<Arc<JwkSet>>,
    fetched_at: Option<Instant>,
}

/// Verifies tokens issued by a Cognito user pool against the pool's
/// published signing keys.
pub struct CognitoAuthorizer {
    issuer: String,
    jwks_url: String,
    client_id: Option<String>,
    http: reqwest::Client,
    cache: RwLock<KeyCache>,
    refresh: Mutex<()>,
    refetch_interval: Duration,
}

impl CognitoAuthorizer {
    pub fn new(region: &str, user_pool_id: &str, client_id: Option<String>) -> Self {
        let issuer = format!("https://cognito-idp.{region}.amazonaws.com/{user_pool_id}");
        let jwks_url = format!("{issuer}/.well-known/jwks.json");
        Self::with_issuer(issuer, jwks_url, client_id)
    }

    pub fn with_issuer(issuer: String, jwks_url: String, client_id: Option<String>) -> Self {
        Self {
            issuer,
            jwks_url,
            client_id,
            http: reqwest::Client::new(),
            cache: RwLock::new(KeyCache::default()),
            refresh: Mutex::new(()),
            refetch_interval: REFETCH_INTERVAL,
        }
    }

    /// Minimum time between two key set fetches.
    pub fn with_refetch_interval(mut self, interval: Duration) -> Self {
        self.refetch_interval = interval;
        self
    }

    async fn fetch_keys(&self) -> Result<Arc<JwkSet>, AuthError> {
        tracing::debug!("Fetching signing keys from {}", self.jwks_url);

        let keys = self
            .http
            .get(&self.jwks_url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| {
                tracing::error!("Failed to fetch signing keys: {}", err);
                AuthError::KeySetUnavailable(err.to_string())
            })?
            .json::<JwkSet>()
            .await
            .map_err(|err| {
                tracing::error!("Failed to parse signing keys: {}", err);
                AuthError::KeySetUnavailable(err.to_string())
            })?;

        Ok(Arc::new(keys))
    }

    async fn cached_keys(&self, kid: &str) -> Option<Arc<JwkSet>> {
        self.cache
            .read()
            .await
            .keys
            .clone()
            .filter(|keys| keys.find(kid).is_some())
    }

    /// Looks the key up in the cached set. An unknown key id (the pool rotated
    /// its keys) triggers at most one fetch per refetch interval, and only one
    /// fetch runs at a time.
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let keys = match self.cached_keys(kid).await {
            Some(keys) => keys,
            None => self.refresh_keys(kid).await?,
        };

        let jwk = keys
            .find(kid)
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown key id {kid}")))?;

        DecodingKey::from_jwk(jwk).map_err(|err| AuthError::InvalidToken(err.to_string()))
    }

    async fn refresh_keys(&self, kid: &str) -> Result<Arc<JwkSet>, AuthError> {
        let _refresh = self.refresh.lock().await;

        // Another request may have fetched while this one waited.
        if let Some(keys) = self.cached_keys(kid).await {
            return Ok(keys);
        }

        {
            let cache = self.cache.read().await;
            let recent = cache
                .fetched_at
                .is_some_and(|at| at.elapsed() < self.refetch_interval);
            if recent {
                return match &cache.keys {
                    Some(_) => Err(AuthError::InvalidToken(format!("unknown key id {kid}"))),
                    None => Err(AuthError::KeySetUnavailable(
                        "previous fetch failed".into(),
                    )),
                };
            }
        }

        let fetched = self.fetch_keys().await;

        let mut cache = self.cache.write().await;
        cache.fetched_at = Some(Instant::now());
        let keys = fetched?;
        cache.keys = Some(keys.clone());
        Ok(keys)
    }

    fn check_claims(&self, claims: &Claims) -> Result<(), AuthError> {
        if !TOKEN_USES.contains(&claims.token_use.as_str()) {
            return Err(AuthError::Forbidden(format!(
                "unexpected token_use {}",
                claims.token_use
            )));
        }

        let Some(expected) = &self.client_id else {
            return Ok(());
        };

        let presented = match claims.token_use.as_str() {
            "id" => claims.aud.as_ref(),
            _ => claims.client_id.as_ref(),
        };

        match presented {
            Some(client) if client == expected => Ok(()),
            _ => Err(AuthError::Forbidden("token issued for another client".into())),
        }
    }
}

#[async_trait]
impl Authorizer for CognitoAuthorizer {
    async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|err| AuthError::InvalidToken(err.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidToken(format!(
                "unsupported algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing key id".into()))?;

        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        // Access tokens carry no `aud`; the client is checked per token_use.
        validation.validate_aud = false;

        let claims = decode::<Claims>(token, &key, &validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(err.to_string()),
            })?
            .claims;

        self.check_claims(&claims)?;

        Ok(claims)
    }
}
