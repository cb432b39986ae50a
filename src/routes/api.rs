use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;

use crate::repository::DieselRepository;
use crate::services::api::{ClientsQuery, list_clients};

#[derive(Deserialize)]
struct ApiV1ClientsQueryParams {
    query: Option<String>,
}

#[get("/v1/clients")]
pub async fn api_v1_clients(
    params: web::Query<ApiV1ClientsQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = ClientsQuery {
        search: params.into_inner().query,
    };

    match list_clients(repo.get_ref(), query) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::error!("Failed to list clients: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
