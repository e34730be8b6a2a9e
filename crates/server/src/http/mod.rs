use axum::{Router, routing::get};

use crate::{AppState, routes};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::dashboard::router())
        .merge(routes::tickets::router())
        .merge(routes::accounts::router())
        .merge(routes::contacts::router())
        .merge(routes::tasks::router())
        .with_state(state)
}
