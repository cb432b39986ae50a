use serde::{Deserialize, Serialize};

use crate::domain::client::ClientRecord;
use crate::domain::types::ClientId;
use crate::forms::client::{ClientForm, Violation};

/// Query parameters accepted by the index page service.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    /// Optional name filter entered by the user.
    pub search: Option<String>,
    /// Client whose values prefill the form in edit mode.
    pub edit: Option<ClientId>,
}

/// One table row; `position` is the record's place in the store.
#[derive(Debug, Clone, Serialize)]
pub struct ClientRow {
    pub position: usize,
    pub client: ClientRecord,
}

/// Data required to render the main index template.
#[derive(Debug, Serialize)]
pub struct IndexPageData {
    /// Rows surviving the search filter, in store order.
    pub rows: Vec<ClientRow>,
    /// Number of records in the store regardless of the filter.
    pub total: usize,
    /// Search query echoed back to the template when present.
    pub search_query: Option<String>,
    /// Values shown in the add/edit form.
    pub form: ClientForm,
    /// True when the form saves an existing client.
    pub editing: bool,
    /// Violations from the last submit, if it was rejected.
    pub violations: Vec<Violation>,
    /// Field names to highlight.
    pub invalid_fields: Vec<&'static str>,
}
