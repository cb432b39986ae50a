use crate::dto::api::ClientsResponse;
use crate::repository::ClientReader;
use crate::services::ServiceResult;

/// Query parameters accepted by the `/api/v1/clients` service.
#[derive(Debug, Default)]
pub struct ClientsQuery {
    /// Optional name filter applied to the client list.
    pub search: Option<String>,
}

/// Returns all clients in store order, optionally filtered by name.
pub fn list_clients<R>(repo: &R, params: ClientsQuery) -> ServiceResult<ClientsResponse>
where
    R: ClientReader + ?Sized,
{
    let search = params
        .search
        .filter(|s| !s.is_empty());

    let clients: Vec<_> = repo
        .list_clients()?
        .into_iter()
        .filter(|client| search.as_deref().is_none_or(|term| client.name_matches(term)))
        .collect();

    Ok(ClientsResponse {
        total: clients.len(),
        clients,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::forms::client::ClientForm;
    use crate::repository::MemoryRepository;
    use crate::services::main::add_client;

    #[test]
    fn filters_by_name_when_search_given() {
        let repo = MemoryRepository::in_memory();
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        for name in ["Alice Doe", "Bob Stone"] {
            let form = ClientForm {
                full_name: name.to_string(),
                gender: "other".to_string(),
                email: "member@example.com".to_string(),
                phone: "0123 456 789".to_string(),
                goal: "flexibility".to_string(),
                start_date: "2024-02-29".to_string(),
                ..ClientForm::default()
            };
            add_client(&repo, &form, today).unwrap();
        }

        let all = list_clients(&repo, ClientsQuery::default()).unwrap();
        assert_eq!(all.total, 2);

        let bob = list_clients(
            &repo,
            ClientsQuery {
                search: Some("stone".to_string()),
            },
        )
        .unwrap();
        assert_eq!(bob.total, 1);
        assert_eq!(bob.clients[0].full_name.as_str(), "Bob Stone");
    }
}
