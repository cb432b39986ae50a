//! DTOs shaped for the client detail template.

use serde::Serialize;

use crate::domain::client::ClientRecord;
use crate::domain::exercise::ExerciseSuggestions;

/// Aggregated data required to render the client details page.
#[derive(Debug, Serialize)]
pub struct ClientPageData {
    pub client: ClientRecord,
    /// `None` when the page shows a snapshot no longer in the store.
    pub position: Option<usize>,
    pub suggestions: ExerciseSuggestions,
    pub status_message: &'static str,
}
