use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::catalog::http::HttpExerciseCatalog;
use crate::forms::main::TrainingSessionForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, client as client_service};

#[get("/client")]
/// Show the client picked on the list page together with its suggestions.
pub async fn show_client(
    repo: web::Data<DieselRepository>,
    catalog: web::Data<HttpExerciseCatalog>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match client_service::load_client_page(repo.get_ref(), catalog.get_ref()).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "client");
            context.insert("page", &data);
            render_template(&tera, "client/index.html", &context)
        }
        Err(ServiceError::NoSelection) => {
            FlashMessage::error("No client selected!").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load client page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/client/history")]
/// Append a finished training session to the client's history.
pub async fn add_training_session(
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<TrainingSessionForm>,
) -> impl Responder {
    match client_service::record_training_session(repo.get_ref(), &form) {
        Ok(_) => {
            FlashMessage::success("Training session recorded.").send();
            redirect("/client")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Client not found.").send();
            redirect("/")
        }
        Err(ServiceError::Form(_)) => {
            FlashMessage::error("Please describe the session.").send();
            redirect("/client")
        }
        Err(err) => {
            log::error!("Failed to record training session: {err}");
            FlashMessage::error("Failed to record training session.").send();
            redirect("/client")
        }
    }
}
