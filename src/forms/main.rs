use serde::Deserialize;

use crate::domain::types::{ClientId, TrainingNote};
use crate::forms::FormError;

#[derive(Deserialize)]
/// Row action addressing a single client.
pub struct ClientActionForm {
    pub id: ClientId,
}

#[derive(Deserialize)]
/// Delete request; the page only sets `confirm` after the user agreed.
pub struct DeleteClientForm {
    pub id: ClientId,
    #[serde(default)]
    pub confirm: Option<String>,
}

impl DeleteClientForm {
    pub fn confirmed(&self) -> Result<ClientId, FormError> {
        match self.confirm.as_deref().map(str::trim) {
            Some("yes" | "true" | "on") => Ok(self.id),
            _ => Err(FormError::NotConfirmed),
        }
    }
}

#[derive(Deserialize)]
/// Note about a finished session, appended to the training history.
pub struct TrainingSessionForm {
    pub id: ClientId,
    #[serde(default)]
    pub note: String,
}

impl TrainingSessionForm {
    pub fn to_note(&self) -> Result<TrainingNote, FormError> {
        Ok(TrainingNote::new(self.note.as_str())?)
    }
}
