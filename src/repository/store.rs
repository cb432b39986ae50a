//! The client store: an ordered sequence of client records mirrored into a
//! key-value backend.
//!
//! Records are addressed by position. Every mutation re-persists the whole
//! sequence; there is no partial persistence.

use serde::Serialize;
use serde_json::Value;

use crate::domain::client::{ClientRecord, NewClient, UpdateClient};
use crate::domain::selection::Selection;
use crate::domain::types::{ClientId, TrainingNote};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::kv::KeyValueStore;

/// Key holding the serialized client sequence.
pub const CLIENTS_KEY: &str = "clients";
/// Key holding the position of the last selected row.
pub const SELECTED_INDEX_KEY: &str = "selectedClientIndex";
/// Key holding a snapshot of the last selected record.
pub const SELECTED_CLIENT_KEY: &str = "selectedClient";

/// Version written into the persisted envelope.
pub const STORE_VERSION: u32 = 1;

/// Key collecting stored entries that could not be read back as clients.
pub const QUARANTINE_KEY: &str = "clientsQuarantine";

#[derive(Serialize)]
struct StoredClientsRef<'a> {
    version: u32,
    clients: &'a [ClientRecord],
}

/// Persisted sequence split into readable records and everything else.
#[derive(Default)]
struct StoredClients {
    clients: Vec<ClientRecord>,
    unreadable: Vec<Value>,
}

/// Reads the persisted payload record by record.
///
/// Both the versioned envelope and the bare array written by the first
/// version of the page are accepted. A record that fails to parse is set
/// aside without affecting its neighbours.
fn read_clients<S>(kv: &S) -> RepositoryResult<StoredClients>
where
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = kv.get(CLIENTS_KEY)? else {
        return Ok(StoredClients::default());
    };

    let entries = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(Value::Object(envelope)) => {
            let Some(Value::Array(entries)) = envelope.get("clients").cloned() else {
                log::warn!("Client store envelope has no client list");
                return Ok(StoredClients {
                    clients: Vec::new(),
                    unreadable: vec![Value::Object(envelope)],
                });
            };
            if let Some(version) = envelope.get("version").and_then(Value::as_u64)
                && version > u64::from(STORE_VERSION)
            {
                log::warn!("Client store version {version} is newer than {STORE_VERSION}");
            }
            entries
        }
        Ok(other) => {
            log::warn!("Ignoring client store that is not a list");
            return Ok(StoredClients {
                clients: Vec::new(),
                unreadable: vec![other],
            });
        }
        Err(err) => {
            log::warn!("Ignoring malformed client store: {err}");
            return Ok(StoredClients {
                clients: Vec::new(),
                unreadable: vec![Value::String(raw)],
            });
        }
    };

    let mut stored = StoredClients::default();
    for (position, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<ClientRecord>(entry.clone()) {
            Ok(client) => stored.clients.push(client),
            Err(err) => {
                log::warn!("Ignoring unreadable stored client at position {position}: {err}");
                stored.unreadable.push(entry);
            }
        }
    }
    Ok(stored)
}

/// Moves unreadable entries to [`QUARANTINE_KEY`], after what is already there.
fn quarantine<S>(kv: &S, mut entries: Vec<Value>) -> RepositoryResult<()>
where
    S: KeyValueStore + ?Sized,
{
    let mut kept = match kv.get(QUARANTINE_KEY)? {
        Some(raw) => serde_json::from_str::<Vec<Value>>(&raw)
            .unwrap_or_else(|_| vec![Value::String(raw)]),
        None => Vec::new(),
    };
    log::warn!("Quarantining {} unreadable stored clients", entries.len());
    kept.append(&mut entries);
    kv.set(QUARANTINE_KEY, &serde_json::to_string(&kept)?)
}

/// Reads the persisted client sequence.
///
/// A missing key yields an empty sequence; unreadable records are skipped.
pub fn load_all<S>(kv: &S) -> RepositoryResult<Vec<ClientRecord>>
where
    S: KeyValueStore + ?Sized,
{
    Ok(read_clients(kv)?.clients)
}

/// Reads the last selection. Unparseable parts are treated as absent.
pub fn load_selection<S>(kv: &S) -> RepositoryResult<Selection>
where
    S: KeyValueStore + ?Sized,
{
    let index = kv
        .get(SELECTED_INDEX_KEY)?
        .and_then(|raw| raw.trim().parse::<usize>().ok());

    let snapshot = match kv.get(SELECTED_CLIENT_KEY)? {
        Some(raw) => serde_json::from_str::<ClientRecord>(&raw)
            .map_err(|err| log::warn!("Ignoring malformed selected client: {err}"))
            .ok(),
        None => None,
    };

    Ok(Selection { index, snapshot })
}

/// In-memory client sequence bound to its backing store.
pub struct ClientStore<'a, S: KeyValueStore + ?Sized> {
    kv: &'a S,
    clients: Vec<ClientRecord>,
}

impl<'a, S> ClientStore<'a, S>
where
    S: KeyValueStore + ?Sized,
{
    /// Loads the persisted sequence.
    ///
    /// Records without a stable id get one, and the upgraded sequence is
    /// committed right away so the ids survive the next load. Unreadable
    /// entries are moved to [`QUARANTINE_KEY`] before anything is written
    /// over them.
    pub fn load(kv: &'a S) -> RepositoryResult<Self> {
        let StoredClients {
            mut clients,
            unreadable,
        } = read_clients(kv)?;
        let quarantined = !unreadable.is_empty();
        if quarantined {
            quarantine(kv, unreadable)?;
        }

        let mut upgraded = 0;
        for client in clients.iter_mut().filter(|client| client.id.is_none()) {
            client.id = Some(ClientId::new());
            upgraded += 1;
        }

        let store = Self { kv, clients };
        if upgraded > 0 {
            log::info!("Assigned ids to {upgraded} stored clients");
        }
        if upgraded > 0 || quarantined {
            store.commit()?;
        }
        Ok(store)
    }

    pub fn into_clients(self) -> Vec<ClientRecord> {
        self.clients
    }

    /// Current position of the record with the given id.
    pub fn position(&self, id: ClientId) -> Option<usize> {
        self.clients.iter().position(|client| client.id == Some(id))
    }

    /// Appends a new record with empty history and exercise lists.
    pub fn add(&mut self, new_client: NewClient) -> RepositoryResult<ClientRecord> {
        let record = ClientRecord::from_new(ClientId::new(), new_client);
        self.clients.push(record.clone());
        self.commit()?;
        Ok(record)
    }

    /// Replaces the record at `index`, keeping its history and exercises when
    /// the update leaves them out.
    pub fn update(&mut self, index: usize, updates: UpdateClient) -> RepositoryResult<ClientRecord> {
        let existing = self.clients.get(index).ok_or(RepositoryError::NotFound)?;
        let replaced = updates.apply_to(existing);
        self.clients[index] = replaced.clone();
        self.commit()?;
        Ok(replaced)
    }

    /// Removes the record at `index`; later records shift down by one.
    pub fn delete(&mut self, index: usize) -> RepositoryResult<ClientRecord> {
        if index >= self.clients.len() {
            return Err(RepositoryError::NotFound);
        }
        let removed = self.clients.remove(index);
        self.commit()?;
        Ok(removed)
    }

    /// Records `index` and a snapshot of its record for the detail page.
    pub fn select(&self, index: usize) -> RepositoryResult<Selection> {
        let snapshot = self.clients.get(index).ok_or(RepositoryError::NotFound)?;
        self.kv.set(SELECTED_INDEX_KEY, &index.to_string())?;
        self.kv
            .set(SELECTED_CLIENT_KEY, &serde_json::to_string(snapshot)?)?;
        Ok(Selection {
            index: Some(index),
            snapshot: Some(snapshot.clone()),
        })
    }

    /// Stores the next-session exercises of the record at `index`.
    ///
    /// A record that already has exercises keeps them and is returned
    /// unchanged, so the first list written wins.
    pub fn set_next_exercises(
        &mut self,
        index: usize,
        exercises: Vec<String>,
    ) -> RepositoryResult<ClientRecord> {
        let client = self.clients.get_mut(index).ok_or(RepositoryError::NotFound)?;
        if !client.next_exercises.is_empty() {
            return Ok(client.clone());
        }
        client.next_exercises = exercises;
        let updated = client.clone();
        self.commit()?;
        Ok(updated)
    }

    /// Appends one entry to the training history of the record at `index`.
    pub fn append_training_history(
        &mut self,
        index: usize,
        note: TrainingNote,
    ) -> RepositoryResult<ClientRecord> {
        let client = self.clients.get_mut(index).ok_or(RepositoryError::NotFound)?;
        client.push_history(note);
        let updated = client.clone();
        self.commit()?;
        Ok(updated)
    }

    /// Persists the whole sequence.
    fn commit(&self) -> RepositoryResult<()> {
        let payload = serde_json::to_string(&StoredClientsRef {
            version: STORE_VERSION,
            clients: &self.clients,
        })?;
        self.kv.set(CLIENTS_KEY, &payload)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::domain::client::fixtures::new_client;
    use crate::domain::client::{FitnessGoal, Gender};
    use crate::domain::types::{ClientEmail, ClientName, PhoneNumber};
    use crate::repository::kv::MemoryKeyValueStore;

    fn names(clients: &[ClientRecord]) -> Vec<&str> {
        clients.iter().map(|c| c.full_name.as_str()).collect()
    }

    #[test]
    fn load_all_is_empty_when_absent_or_malformed() {
        let kv = MemoryKeyValueStore::new();
        assert!(load_all(&kv).unwrap().is_empty());

        kv.set(CLIENTS_KEY, "{not json").unwrap();
        assert!(load_all(&kv).unwrap().is_empty());

        kv.set(CLIENTS_KEY, r#"[{"fullName": 5}]"#).unwrap();
        assert!(load_all(&kv).unwrap().is_empty());
    }

    #[test]
    fn add_to_empty_store_yields_one_record_with_empty_lists() {
        let kv = MemoryKeyValueStore::new();
        let mut store = ClientStore::load(&kv).unwrap();

        let added = store.add(new_client("Jordan Lee")).unwrap();

        let clients = load_all(&kv).unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients.last(), Some(&added));
        assert!(clients[0].training_history.is_empty());
        assert!(clients[0].next_exercises.is_empty());
        assert!(clients[0].id.is_some());
    }

    #[test]
    fn update_preserves_lists_and_overwrites_fields() {
        let kv = MemoryKeyValueStore::new();
        let mut store = ClientStore::load(&kv).unwrap();
        store.add(new_client("Alice Doe")).unwrap();
        store.add(new_client("Bob Stone")).unwrap();
        store
            .append_training_history(1, TrainingNote::new("Leg day").unwrap())
            .unwrap();
        store
            .set_next_exercises(1, vec!["Plank".to_string()])
            .unwrap();

        let updates = UpdateClient {
            full_name: ClientName::new("Robert Stone").unwrap(),
            age: None,
            gender: Gender::Male,
            email: ClientEmail::new("rob@example.org").unwrap(),
            phone: PhoneNumber::new("+1 555 000 1111").unwrap(),
            goal: FitnessGoal::Endurance,
            start_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            training_history: None,
            next_exercises: None,
        };
        store.update(1, updates).unwrap();

        let clients = load_all(&kv).unwrap();
        let bob = &clients[1];
        assert_eq!(bob.full_name.as_str(), "Robert Stone");
        assert_eq!(bob.email.as_str(), "rob@example.org");
        assert_eq!(bob.goal, FitnessGoal::Endurance);
        assert_eq!(bob.training_history, vec!["Leg day"]);
        assert_eq!(bob.next_exercises, vec!["Plank"]);
        assert_eq!(clients[0].full_name.as_str(), "Alice Doe");
    }

    #[test]
    fn first_exercise_list_is_kept() {
        let kv = MemoryKeyValueStore::new();
        let mut store = ClientStore::load(&kv).unwrap();
        store.add(new_client("Alice Doe")).unwrap();

        store
            .set_next_exercises(0, vec!["Plank".to_string()])
            .unwrap();
        let second = store
            .set_next_exercises(0, vec!["Squat".to_string()])
            .unwrap();

        assert_eq!(second.next_exercises, vec!["Plank"]);
        assert_eq!(load_all(&kv).unwrap()[0].next_exercises, vec!["Plank"]);
    }

    #[test]
    fn update_out_of_range_is_reported_and_changes_nothing() {
        let kv = MemoryKeyValueStore::new();
        let mut store = ClientStore::load(&kv).unwrap();
        store.add(new_client("Alice Doe")).unwrap();

        let result = store.update(3, new_client("Nobody Here").into());

        assert!(matches!(result, Err(RepositoryError::NotFound)));
        assert_eq!(names(&load_all(&kv).unwrap()), vec!["Alice Doe"]);
    }

    #[test]
    fn delete_shifts_later_records_down() {
        let kv = MemoryKeyValueStore::new();
        let mut store = ClientStore::load(&kv).unwrap();
        for name in ["Alice Doe", "Bob Stone", "Carol King"] {
            store.add(new_client(name)).unwrap();
        }

        let removed = store.delete(0).unwrap();

        assert_eq!(removed.full_name.as_str(), "Alice Doe");
        let clients = load_all(&kv).unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(names(&clients), vec!["Bob Stone", "Carol King"]);
        assert!(matches!(store.delete(2), Err(RepositoryError::NotFound)));
    }

    #[test]
    fn select_records_index_and_snapshot() {
        let kv = MemoryKeyValueStore::new();
        let mut store = ClientStore::load(&kv).unwrap();
        store.add(new_client("Alice Doe")).unwrap();
        let bob = store.add(new_client("Bob Stone")).unwrap();

        store.select(1).unwrap();

        assert_eq!(kv.get(SELECTED_INDEX_KEY).unwrap().as_deref(), Some("1"));
        let selection = load_selection(&kv).unwrap();
        assert_eq!(selection.index, Some(1));
        assert_eq!(selection.snapshot, Some(bob));
        assert!(matches!(store.select(5), Err(RepositoryError::NotFound)));
    }

    #[test]
    fn legacy_array_is_upgraded_with_ids() {
        let kv = MemoryKeyValueStore::new();
        let legacy = json!([{
            "fullName": "Jordan Lee",
            "age": "",
            "gender": "female",
            "email": "jordan@example.com",
            "phone": "555-1234567",
            "goal": "weight-loss",
            "startDate": "2024-01-01",
            "trainingHistory": ["Intro session"],
            "nextExercises": []
        }]);
        kv.set(CLIENTS_KEY, &legacy.to_string()).unwrap();

        let store = ClientStore::load(&kv).unwrap();
        let id = store.into_clients()[0].id.unwrap();

        let persisted: serde_json::Value =
            serde_json::from_str(&kv.get(CLIENTS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted["version"], STORE_VERSION);
        assert_eq!(persisted["clients"][0]["trainingHistory"], json!(["Intro session"]));

        let reloaded = ClientStore::load(&kv).unwrap();
        assert_eq!(reloaded.position(id), Some(0));
    }

    #[test]
    fn one_unreadable_record_does_not_hide_the_others() {
        let kv = MemoryKeyValueStore::new();
        let legacy = json!([
            {
                "fullName": "Alice Doe",
                "gender": "female",
                "email": "alice@example.com",
                "phone": "555-1234567",
                "goal": "endurance",
                "startDate": "2023-01-01",
                "trainingHistory": ["Intro session"]
            },
            {
                "fullName": "Bob Stone",
                "age": "10.5",
                "gender": "male",
                "email": "bob@example.com",
                "phone": "555-7654321",
                "goal": "flexibility",
                "startDate": "2023-02-01"
            },
            { "fullName": "Broken", "gender": "robot" }
        ]);
        kv.set(CLIENTS_KEY, &legacy.to_string()).unwrap();

        assert_eq!(names(&load_all(&kv).unwrap()), vec!["Alice Doe", "Bob Stone"]);

        let mut store = ClientStore::load(&kv).unwrap();
        store.add(new_client("Carol King")).unwrap();

        let clients = load_all(&kv).unwrap();
        assert_eq!(names(&clients), vec!["Alice Doe", "Bob Stone", "Carol King"]);
        assert_eq!(clients[0].training_history, vec!["Intro session"]);
        assert_eq!(clients[1].age.map(|age| age.get()), Some(10));

        let quarantined: serde_json::Value =
            serde_json::from_str(&kv.get(QUARANTINE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(quarantined, json!([{ "fullName": "Broken", "gender": "robot" }]));
    }

    #[test]
    fn unreadable_payload_is_quarantined_before_it_is_overwritten() {
        let kv = MemoryKeyValueStore::new();
        kv.set(CLIENTS_KEY, "{not json").unwrap();

        let mut store = ClientStore::load(&kv).unwrap();
        store.add(new_client("Jordan Lee")).unwrap();

        assert_eq!(names(&load_all(&kv).unwrap()), vec!["Jordan Lee"]);
        assert_eq!(
            kv.get(QUARANTINE_KEY).unwrap().as_deref(),
            Some(r#"["{not json"]"#)
        );

        ClientStore::load(&kv).unwrap();
        assert_eq!(
            kv.get(QUARANTINE_KEY).unwrap().as_deref(),
            Some(r#"["{not json"]"#)
        );
    }

    #[test]
    fn malformed_selection_parts_are_ignored() {
        let kv = MemoryKeyValueStore::new();
        kv.set(SELECTED_INDEX_KEY, "abc").unwrap();
        kv.set(SELECTED_CLIENT_KEY, "{").unwrap();

        assert!(load_selection(&kv).unwrap().is_empty());
    }
}
