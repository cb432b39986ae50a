use chrono::NaiveDate;

use crate::domain::client::ClientRecord;
use crate::domain::selection::Selection;
pub use crate::dto::main::IndexQuery;
use crate::dto::main::{ClientRow, IndexPageData};
use crate::forms::client::{ClientForm, Violation};
use crate::forms::main::{ClientActionForm, DeleteClientForm};
use crate::repository::{ClientReader, ClientWriter};
use crate::services::{ServiceError, ServiceResult};

/// Keeps the rows whose name contains `search`, ignoring case.
///
/// Positions refer to the unfiltered store so row actions stay correct.
pub fn filter_rows(clients: Vec<ClientRecord>, search: Option<&str>) -> Vec<ClientRow> {
    clients
        .into_iter()
        .enumerate()
        .filter(|(_, client)| search.is_none_or(|term| client.name_matches(term)))
        .map(|(position, client)| ClientRow { position, client })
        .collect()
}

/// Loads the client table for the main index page.
pub fn load_index_page<R>(repo: &R, query: IndexQuery) -> ServiceResult<IndexPageData>
where
    R: ClientReader + ?Sized,
{
    let clients = repo.list_clients().map_err(|err| {
        log::error!("Failed to list clients: {err}");
        err
    })?;
    let total = clients.len();

    let search_query = query
        .search
        .filter(|s| !s.is_empty());

    let editing = query.edit.and_then(|id| {
        clients
            .iter()
            .find(|client| client.id == Some(id))
            .map(ClientForm::from)
    });

    Ok(IndexPageData {
        rows: filter_rows(clients, search_query.as_deref()),
        total,
        search_query,
        editing: editing.is_some(),
        form: editing.unwrap_or_default(),
        violations: Vec::new(),
        invalid_fields: Vec::new(),
    })
}

/// Index page re-rendered around a rejected form submission.
pub fn load_rejected_form_page<R>(
    repo: &R,
    form: ClientForm,
    violations: Vec<Violation>,
) -> ServiceResult<IndexPageData>
where
    R: ClientReader + ?Sized,
{
    let mut data = load_index_page(repo, IndexQuery::default())?;
    data.editing = form.id.is_some();
    data.form = form;
    data.invalid_fields = violations.iter().map(|violation| violation.field).collect();
    data.violations = violations;
    Ok(data)
}

/// Validates the add-client form and appends a new client record.
pub fn add_client<R>(repo: &R, form: &ClientForm, today: NaiveDate) -> ServiceResult<ClientRecord>
where
    R: ClientWriter + ?Sized,
{
    let new_client = form.to_new_client(today)?;

    let client = repo.create_client(new_client).map_err(|err| {
        log::error!("Failed to add a client: {err}");
        err
    })?;
    log::info!("Added client {}", client.full_name);

    Ok(client)
}

/// Validates the edit form and replaces the stored client, keeping its
/// training history and suggested exercises.
pub fn save_client<R>(repo: &R, form: &ClientForm, today: NaiveDate) -> ServiceResult<ClientRecord>
where
    R: ClientWriter + ?Sized,
{
    let id = form.id.ok_or(ServiceError::NotFound)?;
    let updates = form.to_new_client(today)?.into();

    let client = repo.update_client(id, updates).map_err(|err| {
        log::error!("Failed to update client {id}: {err}");
        err
    })?;

    Ok(client)
}

/// Removes a client once the user confirmed the deletion.
pub fn delete_client<R>(repo: &R, form: &DeleteClientForm) -> ServiceResult<ClientRecord>
where
    R: ClientWriter + ?Sized,
{
    let id = form.confirmed()?;

    let removed = repo.delete_client(id).map_err(|err| {
        log::error!("Failed to delete client {id}: {err}");
        err
    })?;
    log::info!("Deleted client {}", removed.full_name);

    Ok(removed)
}

/// Remembers the row the user opened so the detail page can show it.
pub fn select_client<R>(repo: &R, form: &ClientActionForm) -> ServiceResult<Selection>
where
    R: ClientWriter + ?Sized,
{
    repo.select_client(form.id).map_err(|err| {
        log::error!("Failed to select client {}: {err}", form.id);
        ServiceError::from(err)
    })
}
