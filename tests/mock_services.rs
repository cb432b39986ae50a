use chrono::NaiveDate;
use gym_clients::domain::client::{ClientRecord, FitnessGoal, Gender};
use gym_clients::domain::selection::Selection;
use gym_clients::domain::types::{ClientEmail, ClientId, ClientName, PhoneNumber};
use gym_clients::dto::main::IndexQuery;
use gym_clients::forms::client::ClientForm;
use gym_clients::forms::main::{ClientActionForm, TrainingSessionForm};
use gym_clients::repository::errors::RepositoryError;
use gym_clients::repository::mock::MockRepository;
use gym_clients::services::ServiceError;
use gym_clients::services::client::{record_training_session, resolve_selected_client};
use gym_clients::services::main::{add_client, load_index_page, select_client};

fn record(name: &str) -> ClientRecord {
    ClientRecord {
        id: Some(ClientId::new()),
        full_name: ClientName::new(name).unwrap(),
        age: None,
        gender: Gender::Unspecified,
        email: ClientEmail::new("member@example.com").unwrap(),
        phone: PhoneNumber::new("555 123 4567").unwrap(),
        goal: FitnessGoal::GeneralFitness,
        start_date: NaiveDate::from_ymd_opt(2023, 9, 1).unwrap(),
        training_history: Vec::new(),
        next_exercises: Vec::new(),
    }
}

#[test]
fn invalid_form_never_reaches_the_repository() {
    let mut repo = MockRepository::new();
    repo.expect_create_client().never();

    let form = ClientForm {
        full_name: "Jordan Lee".to_string(),
        email: "not-an-email".to_string(),
        ..ClientForm::default()
    };
    let result = add_client(&repo, &form, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());

    assert!(matches!(result, Err(ServiceError::Invalid(_))));
}

#[test]
fn storage_failure_on_add_is_internal() {
    let mut repo = MockRepository::new();
    repo.expect_create_client()
        .times(1)
        .returning(|_| Err(RepositoryError::DatabaseError("disk full".to_string())));

    let form = ClientForm {
        full_name: "Jordan Lee".to_string(),
        gender: "male".to_string(),
        email: "jordan@example.com".to_string(),
        phone: "555-1234567".to_string(),
        goal: "muscle-gain".to_string(),
        start_date: "2024-01-01".to_string(),
        ..ClientForm::default()
    };
    let result = add_client(&repo, &form, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());

    assert!(matches!(result, Err(ServiceError::Internal(_))));
}

#[test]
fn index_page_lists_repository_rows() {
    let mut repo = MockRepository::new();
    let clients = vec![record("Alice Doe"), record("Bob Stone")];
    repo.expect_list_clients()
        .times(1)
        .returning(move || Ok(clients.clone()));

    let data = load_index_page(&repo, IndexQuery::default()).unwrap();

    assert_eq!(data.total, 2);
    assert_eq!(data.rows[1].position, 1);
    assert_eq!(data.rows[1].client.full_name.as_str(), "Bob Stone");
}

#[test]
fn select_of_missing_client_is_not_found() {
    let mut repo = MockRepository::new();
    repo.expect_select_client()
        .times(1)
        .returning(|_| Err(RepositoryError::NotFound));

    let result = select_client(&repo, &ClientActionForm { id: ClientId::new() });

    assert!(matches!(result, Err(ServiceError::NotFound)));
}

#[test]
fn stale_index_resolves_through_snapshot_id() {
    let mut repo = MockRepository::new();
    let alice = record("Alice Doe");
    let bob = record("Bob Stone");
    let selection = Selection {
        index: Some(1),
        snapshot: Some(bob.clone()),
    };
    let remaining = vec![bob.clone()];
    repo.expect_get_selection()
        .returning(move || Ok(selection.clone()));
    repo.expect_list_clients()
        .returning(move || Ok(remaining.clone()));

    let resolved = resolve_selected_client(&repo).unwrap();

    assert_eq!(resolved.position, Some(0));
    assert_eq!(resolved.client.id, bob.id);
    assert_ne!(resolved.client.id, alice.id);
}

#[test]
fn blank_training_note_is_rejected_before_storage() {
    let mut repo = MockRepository::new();
    repo.expect_append_training_history().never();

    let form = TrainingSessionForm {
        id: ClientId::new(),
        note: "   ".to_string(),
    };

    assert!(matches!(
        record_training_session(&repo, &form),
        Err(ServiceError::Form(_))
    ));
}
