use async_trait::async_trait;
use aws_config::{retry::RetryConfig, BehaviorVersion, Region};
use aws_sdk_dynamodb::{
    config::Credentials,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    types::AttributeValue,
    Client,
};
use serde_json::Value;
use std::collections::HashMap;

use super::{attribute, Item, Key, PutAck, Result, Storage, StoreError, PARTITION_KEY, SORT_KEY};
use crate::types::{StoreConfig, StoreMode};

impl<E, R> From<SdkError<E, R>> for StoreError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    fn from(err: SdkError<E, R>) -> Self {
        let code = err.code().map(str::to_string).unwrap_or_else(|| {
            match &err {
                SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => "NetworkingError",
                _ => "UnknownError",
            }
            .to_string()
        });
        let message = err
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

        StoreError { code, message }
    }
}

#[derive(Clone)]
pub struct DynamoDbStorage {
    client: Client,
}

impl DynamoDbStorage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn connect(cfg: &StoreConfig) -> Self {
        // Each request is attempted once; failures go straight back to the caller.
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .retry_config(RetryConfig::disabled());

        if let Some(endpoint) = &cfg.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        if cfg.mode == StoreMode::Local {
            // DynamoDB Local accepts any signature but the SDK still has to sign.
            loader = loader.credentials_provider(Credentials::new(
                "local", "local", None, None, "local",
            ));
        }

        Self::new(Client::new(&loader.load().await))
    }

    async fn query_first(&self, table: &str, id: &Value) -> Result<Option<Item>> {
        let output = self
            .client
            .query()
            .table_name(table)
            .key_condition_expression("#pk = :pk")
            .expression_attribute_names("#pk", PARTITION_KEY)
            .expression_attribute_values(":pk", attribute::to_attribute(id))
            .limit(1)
            .send()
            .await?;

        Ok(output.items().first().map(attribute::from_attributes))
    }
}

#[async_trait]
impl Storage for DynamoDbStorage {
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>> {
        let (id, name) = match key {
            Key::Partition { id } => return self.query_first(table, id).await,
            Key::Full { id, name } => (id, name),
        };

        let mut attributes: HashMap<String, AttributeValue> = HashMap::new();
        attributes.insert(PARTITION_KEY.to_string(), attribute::to_attribute(id));
        attributes.insert(SORT_KEY.to_string(), attribute::to_attribute(name));

        let output = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(attributes))
            .send()
            .await?;

        Ok(output.item().map(attribute::from_attributes))
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<PutAck> {
        let output = self
            .client
            .put_item()
            .table_name(table)
            .set_item(Some(attribute::to_attributes(&item)))
            .send()
            .await?;

        Ok(PutAck(
            output
                .attributes()
                .map(attribute::from_attributes)
                .unwrap_or_default(),
        ))
    }
}
