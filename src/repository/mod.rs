use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::client::{ClientRecord, NewClient, UpdateClient};
use crate::domain::selection::Selection;
use crate::domain::types::{ClientId, TrainingNote};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::kv::{DieselKeyValueStore, KeyValueStore, MemoryKeyValueStore};
use crate::repository::store::ClientStore;

pub mod errors;
pub mod kv;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod store;

pub trait ClientReader {
    fn list_clients(&self) -> RepositoryResult<Vec<ClientRecord>>;
    fn get_selection(&self) -> RepositoryResult<Selection>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: NewClient) -> RepositoryResult<ClientRecord>;
    fn update_client(&self, id: ClientId, updates: UpdateClient) -> RepositoryResult<ClientRecord>;
    fn delete_client(&self, id: ClientId) -> RepositoryResult<ClientRecord>;
    fn select_client(&self, id: ClientId) -> RepositoryResult<Selection>;
    fn save_next_exercises(
        &self,
        id: ClientId,
        exercises: Vec<String>,
    ) -> RepositoryResult<ClientRecord>;
    fn append_training_history(
        &self,
        id: ClientId,
        note: TrainingNote,
    ) -> RepositoryResult<ClientRecord>;
}

/// Repository over a [`ClientStore`] persisted in a key-value backend.
///
/// Each call loads the store, applies one operation and commits. The cycles
/// are serialized through a lock shared by all clones, so concurrent workers
/// never interleave a load with another worker's commit.
#[derive(Clone)]
pub struct StoreRepository<S> {
    kv: S,
    lock: Arc<Mutex<()>>,
}

pub type DieselRepository = StoreRepository<DieselKeyValueStore>;
pub type MemoryRepository = StoreRepository<MemoryKeyValueStore>;

impl<S: KeyValueStore> StoreRepository<S> {
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            lock: Arc::new(Mutex::new(())),
        }
    }

    fn guard(&self) -> RepositoryResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|e| RepositoryError::Unexpected(format!("Poisoned store lock: {e}")))
    }

    /// Runs `op` against the record with `id` while holding the lock.
    fn with_client<T>(
        &self,
        id: ClientId,
        op: impl FnOnce(&mut ClientStore<'_, S>, usize) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let _guard = self.guard()?;
        let mut store = ClientStore::load(&self.kv)?;
        let index = store.position(id).ok_or(RepositoryError::NotFound)?;
        op(&mut store, index)
    }
}

impl MemoryRepository {
    /// Repository over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(MemoryKeyValueStore::new())
    }
}

impl<S: KeyValueStore> ClientReader for StoreRepository<S> {
    fn list_clients(&self) -> RepositoryResult<Vec<ClientRecord>> {
        let _guard = self.guard()?;
        Ok(ClientStore::load(&self.kv)?.into_clients())
    }

    fn get_selection(&self) -> RepositoryResult<Selection> {
        store::load_selection(&self.kv)
    }
}

impl<S: KeyValueStore> ClientWriter for StoreRepository<S> {
    fn create_client(&self, new_client: NewClient) -> RepositoryResult<ClientRecord> {
        let _guard = self.guard()?;
        ClientStore::load(&self.kv)?.add(new_client)
    }

    fn update_client(&self, id: ClientId, updates: UpdateClient) -> RepositoryResult<ClientRecord> {
        self.with_client(id, |store, index| store.update(index, updates))
    }

    fn delete_client(&self, id: ClientId) -> RepositoryResult<ClientRecord> {
        self.with_client(id, |store, index| store.delete(index))
    }

    fn select_client(&self, id: ClientId) -> RepositoryResult<Selection> {
        self.with_client(id, |store, index| store.select(index))
    }

    fn save_next_exercises(
        &self,
        id: ClientId,
        exercises: Vec<String>,
    ) -> RepositoryResult<ClientRecord> {
        self.with_client(id, |store, index| {
            store.set_next_exercises(index, exercises)
        })
    }

    fn append_training_history(
        &self,
        id: ClientId,
        note: TrainingNote,
    ) -> RepositoryResult<ClientRecord> {
        self.with_client(id, |store, index| {
            store.append_training_history(index, note)
        })
    }
}
