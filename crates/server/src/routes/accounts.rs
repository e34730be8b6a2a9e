use axum::{
    Router,
    extract::{Path, Query, State},
    response::{Json as ResponseJson, Redirect},
    routing::get,
};
use db::TransactionTrait;
use db::models::{
    account::{Account, CreateAccount, UpdateAccount},
    contact::Contact,
    ticket::Ticket,
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::ApiError,
    response::ApiResponse,
    routes::{optional, required},
};

#[derive(Debug, Deserialize)]
pub struct AccountListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccountFormData {
    pub account: Option<Account>,
}

/// Account detail with its related records, per the entity relationships.
#[derive(Debug, Serialize)]
pub struct AccountDetail {
    pub account: Account,
    pub contacts: Vec<Contact>,
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Deserialize)]
pub struct AccountForm {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

impl AccountForm {
    fn into_create(self) -> Result<CreateAccount, ApiError> {
        Ok(CreateAccount {
            name: required(self.name, "name")?,
            industry: optional(self.industry),
            phone: optional(self.phone),
            website: optional(self.website),
            address: optional(self.address),
        })
    }

    fn into_update(self) -> Result<UpdateAccount, ApiError> {
        let data = self.into_create()?;
        Ok(UpdateAccount {
            name: data.name,
            industry: data.industry,
            phone: data.phone,
            website: data.website,
            address: data.address,
        })
    }
}

pub async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<AccountListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Account>>>, ApiError> {
    let accounts = Account::search(&state.db().pool, query.search.as_deref()).await?;
    Ok(ResponseJson(ApiResponse::success(accounts)))
}

pub async fn new_account_form() -> ResponseJson<ApiResponse<AccountFormData>> {
    ResponseJson(ApiResponse::success(AccountFormData { account: None }))
}

pub async fn create_account(
    State(state): State<AppState>,
    axum::Form(form): axum::Form<AccountForm>,
) -> Result<Redirect, ApiError> {
    let data = form.into_create()?;

    let tx = state.db().pool.begin().await.map_err(ApiError::from)?;
    let account = Account::create(&tx, &data).await?;
    tx.commit().await.map_err(ApiError::from)?;

    tracing::debug!(name = %account.name, "created account");
    Ok(Redirect::to(&format!("/accounts/{}", account.id)))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<AccountDetail>>, ApiError> {
    let pool = &state.db().pool;
    let account = Account::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Account {id} not found")))?;
    let contacts = Contact::find_by_account_id(pool, account.id).await?;
    let tickets = Ticket::find_by_account_id(pool, account.id).await?;

    Ok(ResponseJson(ApiResponse::success(AccountDetail {
        account,
        contacts,
        tickets,
    })))
}

pub async fn edit_account_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<AccountFormData>>, ApiError> {
    let account = Account::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Account {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(AccountFormData {
        account: Some(account),
    })))
}

pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Form(form): axum::Form<AccountForm>,
) -> Result<Redirect, ApiError> {
    let data = form.into_update()?;

    let tx = state.db().pool.begin().await.map_err(ApiError::from)?;
    let account = Account::update(&tx, id, &data).await?;
    tx.commit().await.map_err(ApiError::from)?;

    Ok(Redirect::to(&format!("/accounts/{}", account.id)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts/new", get(new_account_form).post(create_account))
        .route("/accounts/{id}", get(get_account))
        .route(
            "/accounts/{id}/edit",
            get(edit_account_form).post(update_account),
        )
}
