use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::AppState;

use super::models::{ErrorResponse, QueryParams};

pub async fn query(State(state): State<AppState>, Query(params): Query<QueryParams>) -> Response {
    match state.advisor.answer(params.q.as_deref()).await {
        Ok(advice) => (StatusCode::OK, Json(advice)).into_response(),
        Err(err) => {
            error!(mode = ?state.advisor.mode(), error = %err, "query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(state.advisor.failure_advice(&err)),
            )
                .into_response()
        }
    }
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "route not found".to_string(),
        }),
    )
        .into_response()
}
