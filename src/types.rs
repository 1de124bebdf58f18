use crate::modules::auth::service::{Authorizer, CognitoAuthorizer, PermissiveAuthorizer};
use crate::utils::storage::{self, Storage};
use async_trait::async_trait;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TABLE: &str = "customer";
const DEFAULT_REMOTE_REGION: &str = "ap-northeast-1";
const LOCAL_REGION: &str = "localhost";
const LOCAL_ENDPOINT: &str = "http://localhost:8000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("AUTH_MODE=disabled is not allowed in production")]
    InsecureAuthMode,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AppEnvironment {
    Production,
    Development,
}

impl AppEnvironment {
    pub fn from(raw_environment: &str) -> Self {
        match raw_environment {
            "development" => Self::Development,
            _ => Self::Production,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StoreMode {
    Local,
    Remote,
    Memory,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AuthMode {
    Cognito,
    Disabled,
}

/// Whether `GET /api/v1/message` goes through the authorization gate.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum MessagePolicy {
    #[default]
    Inherit,
    Public,
}

macro_rules! parse_variants {
    ($ty:ty, $name:literal, { $($raw:literal => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($raw => Ok($variant),)+
                    _ => Err(ConfigError::Invalid {
                        name: $name,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

parse_variants!(StoreMode, "STORE_MODE", {
    "local" => StoreMode::Local,
    "remote" => StoreMode::Remote,
    "memory" => StoreMode::Memory,
});

parse_variants!(AuthMode, "AUTH_MODE", {
    "cognito" => AuthMode::Cognito,
    "disabled" => AuthMode::Disabled,
});

parse_variants!(MessagePolicy, "MESSAGE_AUTH", {
    "inherit" => MessagePolicy::Inherit,
    "public" => MessagePolicy::Public,
});

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: AppEnvironment,
    pub request_timeout: Duration,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoreConfig {
    pub mode: StoreMode,
    pub endpoint: Option<String>,
    pub region: String,
    pub customer_table: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub user_pool_id: Option<String>,
    pub region: String,
    pub client_id: Option<String>,
    pub message_policy: MessagePolicy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
}

fn parse_number<T: FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.parse::<T>()
        .map_err(|_| ConfigError::Invalid { name, value: raw })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let environment = AppEnvironment::from(var("APP_ENV").as_deref().unwrap_or("production"));
        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var("PORT") {
            Some(raw) => parse_number::<u16>("PORT", raw)?,
            None => DEFAULT_PORT,
        };
        let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number::<u64>("REQUEST_TIMEOUT_SECS", raw)?),
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let store_mode = match var("STORE_MODE") {
            Some(raw) => raw.parse::<StoreMode>()?,
            None if environment == AppEnvironment::Development => StoreMode::Local,
            None => StoreMode::Remote,
        };
        let (default_region, default_endpoint) = match store_mode {
            StoreMode::Local => (LOCAL_REGION, Some(LOCAL_ENDPOINT.to_string())),
            StoreMode::Remote | StoreMode::Memory => (DEFAULT_REMOTE_REGION, None),
        };
        let store_region = var("STORE_REGION").unwrap_or_else(|| default_region.to_string());
        let customer_table = var("CUSTOMER_TABLE")
            .or_else(|| var("USER_TABLE"))
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        let auth_mode = match var("AUTH_MODE") {
            Some(raw) => raw.parse::<AuthMode>()?,
            None => AuthMode::Cognito,
        };
        if auth_mode == AuthMode::Disabled && environment == AppEnvironment::Production {
            return Err(ConfigError::InsecureAuthMode);
        }
        let user_pool_id = var("COGNITO_USER_POOL_ID");
        if auth_mode == AuthMode::Cognito && user_pool_id.is_none() {
            return Err(ConfigError::Missing("COGNITO_USER_POOL_ID"));
        }
        let auth_region = var("COGNITO_REGION").unwrap_or_else(|| match store_mode {
            StoreMode::Remote => store_region.clone(),
            StoreMode::Local | StoreMode::Memory => DEFAULT_REMOTE_REGION.to_string(),
        });
        let message_policy = match var("MESSAGE_AUTH") {
            Some(raw) => raw.parse::<MessagePolicy>()?,
            None => MessagePolicy::default(),
        };

        Ok(Self {
            app: AppConfig {
                host,
                port,
                environment,
                request_timeout,
            },
            store: StoreConfig {
                mode: store_mode,
                endpoint: var("STORE_ENDPOINT").or(default_endpoint),
                region: store_region,
                customer_table,
            },
            auth: AuthConfig {
                mode: auth_mode,
                user_pool_id,
                region: auth_region,
                client_id: var("COGNITO_CLIENT_ID"),
                message_policy,
            },
        })
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub host: String,
    pub port: u16,
    pub environment: AppEnvironment,
    pub request_timeout: Duration,
}

#[derive(Clone)]
pub struct StorageContext {
    pub client: Arc<dyn Storage>,
    pub customer_table: String,
}

#[derive(Clone)]
pub struct AuthContext {
    pub authorizer: Arc<dyn Authorizer>,
    pub message_policy: MessagePolicy,
}

#[derive(Clone)]
pub struct Context {
    pub app: AppContext,
    pub storage: StorageContext,
    pub auth: AuthContext,
}

impl Context {
    /// Assembles a context around already constructed collaborators.
    pub fn new(
        config: &Config,
        storage: Arc<dyn Storage>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            app: AppContext {
                host: config.app.host.clone(),
                port: config.app.port,
                environment: config.app.environment,
                request_timeout: config.app.request_timeout,
            },
            storage: StorageContext {
                client: storage,
                customer_table: config.store.customer_table.clone(),
            },
            auth: AuthContext {
                authorizer,
                message_policy: config.auth.message_policy,
            },
        }
    }
}

#[async_trait]
pub trait ToContext {
    async fn to_context(self) -> Result<Context, ConfigError>;
}

#[async_trait]
impl ToContext for Config {
    async fn to_context(self) -> Result<Context, ConfigError> {
        let authorizer: Arc<dyn Authorizer> = match (self.auth.mode, &self.auth.user_pool_id) {
            (AuthMode::Cognito, Some(user_pool_id)) => Arc::new(CognitoAuthorizer::new(
                &self.auth.region,
                user_pool_id,
                self.auth.client_id.clone(),
            )),
            (AuthMode::Cognito, None) => return Err(ConfigError::Missing("COGNITO_USER_POOL_ID")),
            (AuthMode::Disabled, _) => {
                tracing::warn!("Authorization is disabled; any bearer token is accepted");
                Arc::new(PermissiveAuthorizer)
            }
        };

        let storage = storage::connect(&self.store).await;

        Ok(Context::new(&self, storage, authorizer))
    }
}
