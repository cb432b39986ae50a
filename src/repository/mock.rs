//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::client::{ClientRecord, NewClient, UpdateClient};
use crate::domain::selection::Selection;
use crate::domain::types::{ClientId, TrainingNote};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientReader, ClientWriter};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn list_clients(&self) -> RepositoryResult<Vec<ClientRecord>>;
        fn get_selection(&self) -> RepositoryResult<Selection>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: NewClient) -> RepositoryResult<ClientRecord>;
        fn update_client(
            &self,
            id: ClientId,
            updates: UpdateClient,
        ) -> RepositoryResult<ClientRecord>;
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
}
