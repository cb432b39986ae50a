use serde::Serialize;

use crate::domain::client::ClientRecord;

/// Result payload returned by the `/api/v1/clients` endpoint.
#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    /// Number of clients matching the filter.
    pub total: usize,
    pub clients: Vec<ClientRecord>,
}
