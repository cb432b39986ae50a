use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::{Local, NaiveDate};
use tera::Tera;

use crate::domain::client::{FitnessGoal, Gender};
use crate::dto::main::{IndexPageData, IndexQuery};
use crate::forms::client::{ClientForm, Violation};
use crate::forms::main::{ClientActionForm, DeleteClientForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, main as main_service};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn render_index(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    data: &IndexPageData,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "index");
    context.insert("page", data);
    context.insert("genders", &Gender::ALL.map(Gender::as_str));
    context.insert("goals", &FitnessGoal::ALL.map(FitnessGoal::as_str));

    render_template(tera, "main/index.html", &context)
}

/// Re-renders the table with the rejected values and their violations.
fn render_rejected(
    repo: &DieselRepository,
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    form: ClientForm,
    violations: Vec<Violation>,
) -> HttpResponse {
    match main_service::load_rejected_form_page(repo, form, violations) {
        Ok(data) => render_index(tera, flash_messages, &data),
        Err(err) => {
            log::error!("Failed to load index page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/")]
pub async fn show_index(
    query: web::Query<IndexQuery>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match main_service::load_index_page(repo.get_ref(), query.into_inner()) {
        Ok(data) => render_index(&tera, &flash_messages, &data),
        Err(err) => {
            log::error!("Failed to load index page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/client/add")]
pub async fn add_client(
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ClientForm>,
) -> impl Responder {
    match main_service::add_client(repo.get_ref(), &form, today()) {
        Ok(_) => {
            FlashMessage::success("Client added successfully!").send();
            redirect("/")
        }
        Err(ServiceError::Invalid(violations)) => {
            render_rejected(&repo, &tera, &flash_messages, form, violations)
        }
        Err(err) => {
            log::error!("Failed to add a client: {err}");
            FlashMessage::error("Failed to add client.").send();
            redirect("/")
        }
    }
}

#[post("/client/save")]
pub async fn save_client(
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ClientForm>,
) -> impl Responder {
    match main_service::save_client(repo.get_ref(), &form, today()) {
        Ok(_) => {
            FlashMessage::success("Client details updated!").send();
            redirect("/")
        }
        Err(ServiceError::Invalid(violations)) => {
            render_rejected(&repo, &tera, &flash_messages, form, violations)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Client not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to update client: {err}");
            FlashMessage::error("Failed to update client.").send();
            redirect("/")
        }
    }
}

#[post("/client/delete")]
pub async fn delete_client(
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DeleteClientForm>,
) -> impl Responder {
    match main_service::delete_client(repo.get_ref(), &form) {
        Ok(_) => FlashMessage::success("Client deleted.").send(),
        Err(ServiceError::NotFound) => FlashMessage::error("Client not found.").send(),
        Err(ServiceError::Form(message)) => FlashMessage::warning(message).send(),
        Err(err) => {
            log::error!("Failed to delete client: {err}");
            FlashMessage::error("Failed to delete client.").send();
        }
    }
    redirect("/")
}

#[post("/client/select")]
pub async fn select_client(
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ClientActionForm>,
) -> impl Responder {
    match main_service::select_client(repo.get_ref(), &form) {
        Ok(_) => redirect("/client"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Client not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to select client: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
