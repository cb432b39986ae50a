//! Hand-over of one client record from the list page to the detail page.

use serde::Serialize;

use crate::domain::client::ClientRecord;

/// The most recent row selection as found in the store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    /// Position of the selected row at the time it was selected.
    pub index: Option<usize>,
    /// Denormalized copy of the record taken at selection time.
    pub snapshot: Option<ClientRecord>,
}

/// A selection matched against the current store contents.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedClient {
    pub client: ClientRecord,
    /// Current position in the store; `None` when only the snapshot survived.
    pub position: Option<usize>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.index.is_none() && self.snapshot.is_none()
    }

    /// Finds the record the selection refers to.
    ///
    /// The stored index wins while it still points at the snapshotted
    /// record, or when the snapshot carries no id to check against. A stale
    /// index is corrected by looking the snapshot's id up. A snapshot whose
    /// record is gone is returned detached from the store; the index then
    /// points at some other client and is ignored.
    pub fn resolve(&self, clients: &[ClientRecord]) -> Option<ResolvedClient> {
        let indexed = self
            .index
            .and_then(|index| clients.get(index).map(|client| (index, client)));
        let snapshot_id = self.snapshot.as_ref().and_then(|snapshot| snapshot.id);

        if let Some((index, client)) = indexed
            && (snapshot_id.is_none() || snapshot_id == client.id)
        {
            return Some(attached(client, index));
        }

        if let Some(id) = snapshot_id
            && let Some(position) = clients.iter().position(|client| client.id == Some(id))
        {
            return Some(attached(&clients[position], position));
        }

        self.snapshot.clone().map(|client| ResolvedClient {
            client,
            position: None,
        })
    }
}

fn attached(client: &ClientRecord, position: usize) -> ResolvedClient {
    ResolvedClient {
        client: client.clone(),
        position: Some(position),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::fixtures::new_client;
    use crate::domain::types::ClientId;

    fn record(name: &str) -> ClientRecord {
        ClientRecord::from_new(ClientId::new(), new_client(name))
    }

    #[test]
    fn empty_selection_resolves_to_nothing() {
        let clients = vec![record("Alice Doe")];
        assert!(Selection::default().is_empty());
        assert_eq!(Selection::default().resolve(&clients), None);
    }

    #[test]
    fn valid_index_is_used() {
        let clients = vec![record("Alice Doe"), record("Bob Stone")];
        let selection = Selection {
            index: Some(1),
            snapshot: Some(clients[1].clone()),
        };

        let resolved = selection.resolve(&clients).unwrap();
        assert_eq!(resolved.position, Some(1));
        assert_eq!(resolved.client.full_name.as_str(), "Bob Stone");
    }

    #[test]
    fn stale_index_is_corrected_by_id() {
        let clients = vec![record("Alice Doe"), record("Bob Stone")];
        let selection = Selection {
            index: Some(0),
            snapshot: Some(clients[1].clone()),
        };

        let resolved = selection.resolve(&clients).unwrap();
        assert_eq!(resolved.position, Some(1));
    }

    #[test]
    fn out_of_range_index_falls_back_to_snapshot() {
        let snapshot = record("Carol King");
        let selection = Selection {
            index: Some(7),
            snapshot: Some(snapshot.clone()),
        };

        let resolved = selection.resolve(&[record("Alice Doe")]).unwrap();
        assert_eq!(resolved.position, None);
        assert_eq!(resolved.client, snapshot);
    }

    #[test]
    fn deleted_record_is_not_replaced_by_its_neighbour() {
        let alice = record("Alice Doe");
        let bob = record("Bob Stone");
        let selection = Selection {
            index: Some(0),
            snapshot: Some(alice.clone()),
        };

        let resolved = selection.resolve(&[bob]).unwrap();
        assert_eq!(resolved.position, None);
        assert_eq!(resolved.client, alice);
    }

    #[test]
    fn index_without_snapshot_is_trusted() {
        let clients = vec![record("Alice Doe")];
        let selection = Selection {
            index: Some(0),
            snapshot: None,
        };

        assert_eq!(selection.resolve(&clients).unwrap().position, Some(0));
    }
}
