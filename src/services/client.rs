use crate::catalog::ExerciseCatalog;
use crate::domain::client::ClientRecord;
use crate::domain::exercise::{ExerciseSuggestions, SUGGESTION_COUNT, pick_suggestions};
use crate::domain::selection::ResolvedClient;
use crate::dto::client::ClientPageData;
use crate::forms::main::TrainingSessionForm;
use crate::repository::{ClientReader, ClientWriter};
use crate::services::{ServiceError, ServiceResult};

/// Finds the record picked on the list page.
pub fn resolve_selected_client<R>(repo: &R) -> ServiceResult<ResolvedClient>
where
    R: ClientReader + ?Sized,
{
    let selection = repo.get_selection()?;
    let clients = repo.list_clients()?;

    selection.resolve(&clients).ok_or_else(|| {
        log::warn!("Detail page opened without a selected client");
        ServiceError::NoSelection
    })
}

/// Returns the saved suggestions, or picks and stores new ones.
///
/// The catalog is only contacted when the client has no suggestions yet.
/// When a concurrent request stored a list first, that list is shown.
/// A detached client (no store position) keeps the new list in memory only.
pub async fn resolve_suggestions<R, C>(
    repo: &R,
    catalog: &C,
    resolved: &mut ResolvedClient,
) -> ExerciseSuggestions
where
    R: ClientWriter + ?Sized,
    C: ExerciseCatalog + ?Sized,
{
    if !resolved.client.next_exercises.is_empty() {
        return ExerciseSuggestions::Saved(resolved.client.next_exercises.clone());
    }

    let exercises = match catalog.fetch_exercises().await {
        Ok(exercises) => exercises,
        Err(err) => {
            log::error!("Error fetching exercises: {err}");
            return ExerciseSuggestions::Failed;
        }
    };

    let names = pick_suggestions(exercises, SUGGESTION_COUNT, &mut rand::rng());

    if let (Some(_), Some(id)) = (resolved.position, resolved.client.id) {
        match repo.save_next_exercises(id, names.clone()) {
            Ok(updated) if updated.next_exercises != names => {
                log::info!("Client {id} already received suggestions from another request");
                let saved = updated.next_exercises.clone();
                resolved.client = updated;
                return ExerciseSuggestions::Saved(saved);
            }
            Ok(updated) => resolved.client = updated,
            Err(err) => {
                log::error!("Failed to save suggested exercises for client {id}: {err}");
                resolved.client.next_exercises = names.clone();
            }
        }
    } else {
        resolved.client.next_exercises = names.clone();
    }

    ExerciseSuggestions::Generated(names)
}

/// Loads everything the client detail page shows.
pub async fn load_client_page<R, C>(repo: &R, catalog: &C) -> ServiceResult<ClientPageData>
where
    R: ClientReader + ClientWriter + ?Sized,
    C: ExerciseCatalog + ?Sized,
{
    let mut resolved = resolve_selected_client(repo)?;
    let suggestions = resolve_suggestions(repo, catalog, &mut resolved).await;

    Ok(ClientPageData {
        status_message: suggestions.status_message(),
        client: resolved.client,
        position: resolved.position,
        suggestions,
    })
}

/// Appends a finished session to the client's training history.
pub fn record_training_session<R>(repo: &R, form: &TrainingSessionForm) -> ServiceResult<ClientRecord>
where
    R: ClientWriter + ?Sized,
{
    let note = form.to_note()?;

    repo.append_training_history(form.id, note).map_err(|err| {
        log::error!("Failed to record training session for {}: {err}", form.id);
        ServiceError::from(err)
    })
}
