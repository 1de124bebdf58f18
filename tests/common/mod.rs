#![allow(dead_code)]

use async_trait::async_trait;
use customer_api::modules::auth::service::{AuthError, Authorizer, Claims};
use customer_api::types::{
    AppConfig, AppEnvironment, AuthConfig, AuthMode, Config, Context, MessagePolicy, StoreConfig,
    StoreMode,
};
use customer_api::utils::storage::{Item, Key, MemoryStorage, PutAck, Storage, StoreError};
use customer_api::App;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const TABLE: &str = "customer";
pub const VALID_TOKEN: &str = "valid-token";
pub const FOREIGN_CLIENT_TOKEN: &str = "foreign-client-token";

/// Accepts exactly one token, denies a second one as issued for another
/// client, and treats everything else as invalid.
pub struct StaticAuthorizer;

#[async_trait]
impl Authorizer for StaticAuthorizer {
    async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        match token {
            VALID_TOKEN => Ok(Claims {
                sub: "user-1".into(),
                token_use: "access".into(),
                ..Default::default()
            }),
            FOREIGN_CLIENT_TOKEN => Err(AuthError::Forbidden("another client".into())),
            _ => Err(AuthError::InvalidToken("unknown".into())),
        }
    }
}

/// Wraps a store and counts every call that reaches it.
pub struct CountingStorage<S> {
    inner: S,
    gets: AtomicUsize,
    puts: AtomicUsize,
}

impl<S> CountingStorage<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            gets: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.gets() + self.puts()
    }
}

#[async_trait]
impl<S: Storage> Storage for CountingStorage<S> {
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_item(table, key).await
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<PutAck, StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put_item(table, item).await
    }
}

/// Fails every call the way a throttled table would.
pub struct FailingStorage;

pub fn throttled() -> StoreError {
    StoreError::new(
        "ProvisionedThroughputExceededException",
        "The level of configured provisioned throughput for the table was exceeded.",
    )
}

#[async_trait]
impl Storage for FailingStorage {
    async fn get_item(&self, _: &str, _: &Key) -> Result<Option<Item>, StoreError> {
        Err(throttled())
    }

    async fn put_item(&self, _: &str, _: Item) -> Result<PutAck, StoreError> {
        Err(throttled())
    }
}

/// Never answers within the request budget.
pub struct StalledStorage;

#[async_trait]
impl Storage for StalledStorage {
    async fn get_item(&self, _: &str, _: &Key) -> Result<Option<Item>, StoreError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(None)
    }

    async fn put_item(&self, _: &str, _: Item) -> Result<PutAck, StoreError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(PutAck::default())
    }
}

pub fn test_config(message_policy: MessagePolicy) -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            environment: AppEnvironment::Development,
            request_timeout: Duration::from_secs(30),
        },
        store: StoreConfig {
            mode: StoreMode::Memory,
            endpoint: None,
            region: "localhost".into(),
            customer_table: TABLE.into(),
        },
        auth: AuthConfig {
            mode: AuthMode::Cognito,
            user_pool_id: Some("ap-northeast-1_test".into()),
            region: "ap-northeast-1".into(),
            client_id: None,
            message_policy,
        },
    }
}

pub fn memory_storage() -> Arc<CountingStorage<MemoryStorage>> {
    Arc::new(CountingStorage::new(MemoryStorage::new([TABLE])))
}

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn_with(config: Config, storage: Arc<dyn Storage>) -> Self {
        let ctx = Context::new(&config, storage, Arc::new(StaticAuthorizer));
        let app = App::new(Arc::new(ctx)).router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder().no_proxy().build().unwrap();

        Self {
            base_url,
            client,
            handle,
        }
    }

    pub async fn spawn(storage: Arc<dyn Storage>) -> Self {
        Self::spawn_with(test_config(MessagePolicy::Inherit), storage).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(VALID_TOKEN)
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(VALID_TOKEN)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
