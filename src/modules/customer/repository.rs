use serde_json::Value;

use crate::utils::storage::{self, Item, Key, PutAck, Storage, PARTITION_KEY, SORT_KEY};

type Result<T> = storage::Result<T>;

/// Fields of a create request. Absent fields stay absent in the stored item;
/// the store's key schema decides whether the write is acceptable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreateCustomerPayload {
    pub id: Option<Value>,
    pub name: Option<Value>,
}

impl From<CreateCustomerPayload> for Item {
    fn from(payload: CreateCustomerPayload) -> Self {
        let mut item = Item::new();
        if let Some(id) = payload.id {
            item.insert(PARTITION_KEY.to_string(), id);
        }
        if let Some(name) = payload.name {
            item.insert(SORT_KEY.to_string(), name);
        }
        item
    }
}

pub async fn find_by_id(
    storage: &dyn Storage,
    table: &str,
    id: String,
    name: Option<String>,
) -> Result<Option<Item>> {
    let key = match name {
        Some(name) => Key::Full {
            id: Value::String(id),
            name: Value::String(name),
        },
        None => Key::Partition {
            id: Value::String(id),
        },
    };

    storage.get_item(table, &key).await.map_err(|err| {
        tracing::error!(
            "Error occurred while fetching customer with id {}: {}",
            key.id(),
            err
        );
        err
    })
}

pub async fn create(
    storage: &dyn Storage,
    table: &str,
    payload: CreateCustomerPayload,
) -> Result<PutAck> {
    storage.put_item(table, payload.into()).await.map_err(|err| {
        tracing::error!("Error occurred while creating a customer: {}", err);
        err
    })
}
