mod attribute;
pub mod dynamodb;
pub mod memory;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::types::{StoreConfig, StoreMode};

pub use dynamodb::DynamoDbStorage;
pub use memory::MemoryStorage;

/// Document view of a stored item.
pub type Item = Map<String, Value>;

pub const PARTITION_KEY: &str = "id";
pub const SORT_KEY: &str = "name";

#[derive(Clone, Debug, PartialEq)]
pub enum Key {
    Full { id: Value, name: Value },
    /// Partition key only. Resolves to the first item of the partition in
    /// sort key order.
    Partition { id: Value },
}

impl Key {
    pub fn id(&self) -> &Value {
        match self {
            Self::Full { id, .. } | Self::Partition { id } => id,
        }
    }
}

/// Attributes handed back by the store after a put. Empty for a plain write.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct PutAck(pub Item);

#[derive(thiserror::Error, Serialize, Clone, Debug, PartialEq)]
#[error("{code}: {message}")]
pub struct StoreError {
    pub code: String,
    pub message: String,
}

impl StoreError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("ValidationException", message)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>>;

    async fn put_item(&self, table: &str, item: Item) -> Result<PutAck>;
}

pub async fn connect(cfg: &StoreConfig) -> Arc<dyn Storage> {
    match cfg.mode {
        StoreMode::Memory => {
            tracing::info!("Using in-memory store with table {}", cfg.customer_table);
            Arc::new(MemoryStorage::new([cfg.customer_table.clone()]))
        }
        StoreMode::Local | StoreMode::Remote => {
            tracing::info!(
                "Using DynamoDB store (mode: {:?}, region: {}, endpoint: {})",
                cfg.mode,
                cfg.region,
                cfg.endpoint.as_deref().unwrap_or("default")
            );
            Arc::new(DynamoDbStorage::connect(cfg).await)
        }
    }
}

/// Checks that a key attribute is a non-empty string, the way DynamoDB
/// validates string key attributes.
pub(crate) fn key_string<'a>(attribute: &str, value: Option<&'a Value>) -> Result<&'a str> {
    match value {
        None => Err(StoreError::validation(format!(
            "One or more parameter values were invalid: Missing the key {attribute} in the item"
        ))),
        Some(Value::String(s)) if s.is_empty() => Err(StoreError::validation(format!(
            "One or more parameter values are not valid. The AttributeValue for a key attribute cannot contain an empty string value. Key: {attribute}"
        ))),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(StoreError::validation(format!(
            "One or more parameter values were invalid: Type mismatch for key {attribute} expected: S"
        ))),
    }
}
