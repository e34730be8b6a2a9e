use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use db::models::dashboard::Dashboard;

use crate::{AppState, error::ApiError, response::ApiResponse};

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Dashboard>>, ApiError> {
    let dashboard = Dashboard::load(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(dashboard)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}
