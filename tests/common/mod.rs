use gym_clients::db::{DbPool, ensure_schema, establish_connection_pool};
use gym_clients::repository::DieselRepository;
use gym_clients::repository::kv::DieselKeyValueStore;
use tempfile::TempDir;

/// SQLite database living in a temporary directory for the test's lifetime.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(filename);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("Failed to establish SQLite connection.");
        ensure_schema(&pool).expect("Failed to create kv_store table");
        TestDb { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    #[allow(dead_code)]
    pub fn kv(&self) -> DieselKeyValueStore {
        DieselKeyValueStore::new(self.pool())
    }

    #[allow(dead_code)]
    pub fn repository(&self) -> DieselRepository {
        DieselRepository::new(self.kv())
    }
}
