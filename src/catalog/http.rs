//! Exercise catalog served as a static JSON file over HTTP.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};

use crate::catalog::{CatalogError, CatalogResult, ExerciseCatalog};
use crate::domain::exercise::Exercise;

/// User agent string for catalog requests.
const USER_AGENT_VALUE: &str = concat!("gym-clients/", env!("CARGO_PKG_VERSION"));

/// Fetches the catalog with a single unauthenticated GET.
#[derive(Debug, Clone)]
pub struct HttpExerciseCatalog {
    client: reqwest::Client,
    url: String,
}

impl HttpExerciseCatalog {
    pub fn new(url: impl Into<String>) -> CatalogResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CatalogError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ExerciseCatalog for HttpExerciseCatalog {
    async fn fetch_exercises(&self) -> CatalogResult<Vec<Exercise>> {
        log::debug!("Fetching exercise catalog from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let exercises = response
            .json::<Vec<Exercise>>()
            .await
            .map_err(|e| CatalogError::JsonParse(e.to_string()))?;
        log::debug!("Exercise catalog returned {} entries", exercises.len());

        Ok(exercises)
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Network(err.to_string())
    }
}
