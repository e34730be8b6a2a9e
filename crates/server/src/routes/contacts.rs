use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{Json as ResponseJson, Redirect},
    routing::get,
};
use db::TransactionTrait;
use db::models::{
    account::Account,
    contact::{Contact, CreateContact, UpdateContact},
    ticket::Ticket,
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::ApiError,
    response::ApiResponse,
    routes::{optional, optional_id, required},
};

#[derive(Debug, Deserialize)]
pub struct ContactListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactFormData {
    pub contact: Option<Contact>,
    pub accounts: Vec<Account>,
}

#[derive(Debug, Serialize)]
pub struct ContactDetail {
    pub contact: Contact,
    pub account: Option<Account>,
    pub tickets: Vec<Ticket>,
}

/// Shape consumed by the dependent account→contact picker.
#[derive(Debug, Serialize)]
pub struct ContactOption {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub account_id: Option<String>,
}

impl ContactForm {
    fn into_create(self) -> Result<CreateContact, ApiError> {
        Ok(CreateContact {
            first_name: required(self.first_name, "first_name")?,
            last_name: required(self.last_name, "last_name")?,
            email: optional(self.email),
            phone: optional(self.phone),
            job_title: optional(self.job_title),
            account_id: optional_id(self.account_id, "account_id")?,
        })
    }

    fn into_update(self) -> Result<UpdateContact, ApiError> {
        let data = self.into_create()?;
        Ok(UpdateContact {
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            job_title: data.job_title,
            account_id: data.account_id,
        })
    }
}

pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Contact>>>, ApiError> {
    let contacts = Contact::search(&state.db().pool, query.search.as_deref()).await?;
    Ok(ResponseJson(ApiResponse::success(contacts)))
}

async fn form_data(state: &AppState, contact: Option<Contact>) -> Result<ContactFormData, ApiError> {
    Ok(ContactFormData {
        contact,
        accounts: Account::find_all(&state.db().pool).await?,
    })
}

pub async fn new_contact_form(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<ContactFormData>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(
        form_data(&state, None).await?,
    )))
}

pub async fn create_contact(
    State(state): State<AppState>,
    axum::Form(form): axum::Form<ContactForm>,
) -> Result<Redirect, ApiError> {
    let data = form.into_create()?;

    let tx = state.db().pool.begin().await.map_err(ApiError::from)?;
    let contact = Contact::create(&tx, &data).await?;
    tx.commit().await.map_err(ApiError::from)?;

    Ok(Redirect::to(&format!("/contacts/{}", contact.id)))
}

pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<ContactDetail>>, ApiError> {
    let pool = &state.db().pool;
    let contact = Contact::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Contact {id} not found")))?;

    let account = match contact.account_id {
        Some(account_id) => Account::find_by_id(pool, account_id).await?,
        None => None,
    };
    let tickets = Ticket::find_by_contact_id(pool, contact.id).await?;

    Ok(ResponseJson(ApiResponse::success(ContactDetail {
        contact,
        account,
        tickets,
    })))
}

pub async fn edit_contact_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<ContactFormData>>, ApiError> {
    let contact = Contact::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Contact {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(
        form_data(&state, Some(contact)).await?,
    )))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Form(form): axum::Form<ContactForm>,
) -> Result<Redirect, ApiError> {
    let data = form.into_update()?;

    let tx = state.db().pool.begin().await.map_err(ApiError::from)?;
    let contact = Contact::update(&tx, id, &data).await?;
    tx.commit().await.map_err(ApiError::from)?;

    Ok(Redirect::to(&format!("/contacts/{}", contact.id)))
}

/// Bare JSON array of `{id, name}` pairs for the account's contacts; an
/// unknown account simply has no contacts.
pub async fn contacts_by_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<Json<Vec<ContactOption>>, ApiError> {
    let contacts = Contact::find_by_account_id(&state.db().pool, account_id).await?;
    let options = contacts
        .into_iter()
        .map(|c| ContactOption {
            name: c.full_name(),
            id: c.id,
        })
        .collect();
    Ok(Json(options))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(list_contacts))
        .route("/contacts/new", get(new_contact_form).post(create_contact))
        .route("/contacts/{id}", get(get_contact))
        .route(
            "/contacts/{id}/edit",
            get(edit_contact_form).post(update_contact),
        )
        .route("/api/contacts/{account_id}", get(contacts_by_account))
}
