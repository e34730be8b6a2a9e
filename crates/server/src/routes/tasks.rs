use axum::{
    Router,
    extract::{Path, Query, State},
    response::{Json as ResponseJson, Redirect},
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use db::TransactionTrait;
use db::models::task::{CreateTask, Task, UpdateTask};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::ApiError,
    response::ApiResponse,
    routes::{enum_filter, enum_or_default, optional, required},
};

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskFormData {
    pub task: Option<Task>,
}

#[derive(Debug, Deserialize)]
pub struct TaskForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub state: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<String>,
}

/// Forms submit due dates as `YYYY-MM-DD`; blank means no due date.
fn parse_due_date(value: Option<String>) -> Result<Option<DateTime<Utc>>, ApiError> {
    match optional(value) {
        None => Ok(None),
        Some(raw) => {
            let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| ApiError::BadRequest(format!("due_date is not a date: {raw}")))?;
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| ApiError::BadRequest(format!("due_date is not a date: {raw}")))?;
            Ok(Some(midnight.and_utc()))
        }
    }
}

impl TaskForm {
    fn into_create(self) -> Result<CreateTask, ApiError> {
        Ok(CreateTask {
            title: required(self.title, "title")?,
            description: optional(self.description),
            due_date: parse_due_date(self.due_date)?,
            state: enum_or_default(self.state, "state")?,
            priority: enum_or_default(self.priority, "priority")?,
            assigned_to: optional(self.assigned_to),
        })
    }

    fn into_update(self) -> Result<UpdateTask, ApiError> {
        let data = self.into_create()?;
        Ok(UpdateTask {
            title: data.title,
            description: data.description,
            due_date: data.due_date,
            state: data.state,
            priority: data.priority,
            assigned_to: data.assigned_to,
        })
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let state_filter = enum_filter(query.state, "state")?;
    let tasks = Task::list(&state.db().pool, state_filter).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn new_task_form() -> ResponseJson<ApiResponse<TaskFormData>> {
    ResponseJson(ApiResponse::success(TaskFormData { task: None }))
}

pub async fn create_task(
    State(state): State<AppState>,
    axum::Form(form): axum::Form<TaskForm>,
) -> Result<Redirect, ApiError> {
    let data = form.into_create()?;

    let tx = state.db().pool.begin().await.map_err(ApiError::from)?;
    Task::create(&tx, &data).await?;
    tx.commit().await.map_err(ApiError::from)?;

    // Tasks have no detail page; writes land back on the list.
    Ok(Redirect::to("/tasks"))
}

pub async fn edit_task_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<TaskFormData>>, ApiError> {
    let task = Task::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task {id} not found")))?;
    Ok(ResponseJson(ApiResponse::success(TaskFormData {
        task: Some(task),
    })))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    axum::Form(form): axum::Form<TaskForm>,
) -> Result<Redirect, ApiError> {
    let data = form.into_update()?;

    let tx = state.db().pool.begin().await.map_err(ApiError::from)?;
    Task::update(&tx, id, &data).await?;
    tx.commit().await.map_err(ApiError::from)?;

    Ok(Redirect::to("/tasks"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks))
        .route("/tasks/new", get(new_task_form).post(create_task))
        .route("/tasks/{id}/edit", get(edit_task_form).post(update_task))
}
