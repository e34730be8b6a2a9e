use axum::{
    Router,
    extract::{Path, Query, State},
    response::{Json as ResponseJson, Redirect},
    routing::get,
};
use db::TransactionTrait;
use db::models::{
    account::Account,
    contact::Contact,
    ticket::{CreateTicket, Ticket, TicketFilter, UpdateTicket},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::ApiError,
    response::ApiResponse,
    routes::{enum_filter, enum_or_default, optional, optional_id, required},
};

#[derive(Debug, Deserialize)]
pub struct TicketListQuery {
    pub state: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
}

/// Reference data for the ticket form: the record under edit (if any) plus
/// the foreign-key picker lists.
#[derive(Debug, Serialize)]
pub struct TicketFormData {
    pub ticket: Option<Ticket>,
    pub accounts: Vec<Account>,
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Serialize)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub account: Option<Account>,
    pub contact: Option<Contact>,
}

#[derive(Debug, Deserialize)]
pub struct TicketForm {
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub state: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
    pub account_id: Option<String>,
    pub contact_id: Option<String>,
}

impl TicketForm {
    fn into_create(self) -> Result<CreateTicket, ApiError> {
        Ok(CreateTicket {
            short_description: required(self.short_description, "short_description")?,
            description: optional(self.description),
            state: enum_or_default(self.state, "state")?,
            priority: enum_or_default(self.priority, "priority")?,
            category: optional(self.category),
            assigned_to: optional(self.assigned_to),
            account_id: optional_id(self.account_id, "account_id")?,
            contact_id: optional_id(self.contact_id, "contact_id")?,
        })
    }

    fn into_update(self) -> Result<UpdateTicket, ApiError> {
        let data = self.into_create()?;
        Ok(UpdateTicket {
            short_description: data.short_description,
            description: data.description,
            state: data.state,
            priority: data.priority,
            category: data.category,
            assigned_to: data.assigned_to,
            account_id: data.account_id,
            contact_id: data.contact_id,
        })
    }
}

pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<TicketListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Ticket>>>, ApiError> {
    let filter = TicketFilter {
        state: enum_filter(query.state, "state")?,
        priority: enum_filter(query.priority, "priority")?,
        search: optional(query.search),
    };
    let tickets = Ticket::list(&state.db().pool, &filter).await?;
    Ok(ResponseJson(ApiResponse::success(tickets)))
}

async fn form_data(state: &AppState, ticket: Option<Ticket>) -> Result<TicketFormData, ApiError> {
    Ok(TicketFormData {
        ticket,
        accounts: Account::find_all(&state.db().pool).await?,
        contacts: Contact::find_all(&state.db().pool).await?,
    })
}

pub async fn new_ticket_form(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<TicketFormData>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(
        form_data(&state, None).await?,
    )))
}

pub async fn create_ticket(
    State(state): State<AppState>,
    axum::Form(form): axum::Form<TicketForm>,
) -> Result<Redirect, ApiError> {
    let data = form.into_create()?;

    // The number is derived from the count inside the same transaction.
    let tx = state.db().pool.begin().await.map_err(ApiError::from)?;
    let ticket = Ticket::create(&tx, &data).await?;
    tx.commit().await.map_err(ApiError::from)?;

    tracing::debug!(number = %ticket.number, "created ticket");
    Ok(Redirect::to(&format!("/tickets/{}", ticket.id)))
}

pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<TicketDetail>>, ApiError> {
    let pool = &state.db().pool;
    let ticket = Ticket::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Ticket {id} not found")))?;

    let account = match ticket.account_id {
        Some(account_id) => Account::find_by_id(pool, account_id).await?,
        None => None,
    };
    let contact = match ticket.contact_id {
        Some(contact_id) => Contact::find_by_id(pool, contact_id).await?,
        None => None,
    };

    Ok(ResponseJson(ApiResponse::success(TicketDetail {
        ticket,
        account,
        contact,
    })))
}

pub async fn edit_ticket_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<TicketFormData>>, ApiError> {
    let ticket = Ticket::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Ticket {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(
        form_data(&state, Some(ticket)).await?,
    )))
}

pub async fn update_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Form(form): axum::Form<TicketForm>,
) -> Result<Redirect, ApiError> {
    let data = form.into_update()?;

    let tx = state.db().pool.begin().await.map_err(ApiError::from)?;
    let ticket = Ticket::update(&tx, id, &data).await?;
    tx.commit().await.map_err(ApiError::from)?;

    Ok(Redirect::to(&format!("/tickets/{}", ticket.id)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tickets", get(list_tickets))
        .route("/tickets/new", get(new_ticket_form).post(create_ticket))
        .route("/tickets/{id}", get(get_ticket))
        .route(
            "/tickets/{id}/edit",
            get(edit_ticket_form).post(update_ticket),
        )
}
