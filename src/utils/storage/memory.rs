use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::{key_string, Item, Key, PutAck, Result, Storage, StoreError, PARTITION_KEY, SORT_KEY};

type Table = BTreeMap<(String, String), Item>;

/// Process-local store honouring the same `id`/`name` key schema as the
/// customer table.
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStorage {
    pub fn new<I, T>(tables: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tables: RwLock::new(
                tables
                    .into_iter()
                    .map(|name| (name.into(), Table::new()))
                    .collect(),
            ),
        }
    }

    pub async fn len(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(BTreeMap::len)
            .unwrap_or_default()
    }

    pub async fn is_empty(&self, table: &str) -> bool {
        self.len(table).await == 0
    }
}

fn table_not_found() -> StoreError {
    StoreError::new(
        "ResourceNotFoundException",
        "Requested resource not found",
    )
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>> {
        let tables = self.tables.read().await;
        let rows = tables.get(table).ok_or_else(table_not_found)?;

        match key {
            Key::Full { id, name } => {
                let id = key_string(PARTITION_KEY, Some(id))?;
                let name = key_string(SORT_KEY, Some(name))?;
                Ok(rows.get(&(id.to_string(), name.to_string())).cloned())
            }
            Key::Partition { id } => {
                let id = key_string(PARTITION_KEY, Some(id))?;
                Ok(rows
                    .range((id.to_string(), String::new())..)
                    .take_while(|((pk, _), _)| pk == id)
                    .map(|(_, item)| item.clone())
                    .next())
            }
        }
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<PutAck> {
        let id = key_string(PARTITION_KEY, item.get(PARTITION_KEY))?.to_string();
        let name = key_string(SORT_KEY, item.get(SORT_KEY))?.to_string();

        let mut tables = self.tables.write().await;
        tables
            .get_mut(table)
            .ok_or_else(table_not_found)?
            .insert((id, name), item);

        Ok(PutAck::default())
    }
}
