//! Key-value backends holding the serialized client store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use diesel::prelude::*;

use crate::db::{DbPool, get_connection};
use crate::models::entry::{Entry, NewEntry};
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// String-keyed storage with whole-value reads and writes.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> RepositoryResult<()>;
    fn remove(&self, key: &str) -> RepositoryResult<()>;
}

/// SQLite-backed store using the `kv_store` table.
#[derive(Clone)]
pub struct DieselKeyValueStore {
    pool: DbPool,
}

impl DieselKeyValueStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl KeyValueStore for DieselKeyValueStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        use crate::schema::kv_store;

        let mut conn = get_connection(&self.pool)?;
        let entry = kv_store::table
            .find(key)
            .select(Entry::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(entry.map(|entry| entry.value))
    }

    fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        use crate::schema::kv_store;

        let mut conn = get_connection(&self.pool)?;
        diesel::replace_into(kv_store::table)
            .values(&NewEntry { key, value })
            .execute(&mut conn)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> RepositoryResult<()> {
        use crate::schema::kv_store;

        let mut conn = get_connection(&self.pool)?;
        diesel::delete(kv_store::table.find(key)).execute(&mut conn)?;

        Ok(())
    }
}

/// Process-local store, mainly for tests and throwaway sessions.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> RepositoryResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| RepositoryError::Unexpected(format!("Poisoned store lock: {e}")))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> RepositoryResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}
