//! Captured request/response body endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use tollgate_data::LogContent;
use tracing::info;

use crate::http::constants::DEFAULT_PRUNE_LIMIT;
use crate::http::errors::{ApiError, map_data_error};
use crate::models::DeletedResponse;
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub(crate) struct PruneQuery {
    before: i64,
    limit: Option<i64>,
}

pub(crate) async fn get_log_content(
    State(state): State<Arc<ApiState>>,
    Path(log_id): Path<i64>,
) -> Result<Json<LogContent>, ApiError> {
    let result = state.log_contents.get_by_log_id(log_id).await;
    state.telemetry.inc_log_content_lookup(result.is_ok());
    result
        .map(Json)
        .map_err(|err| map_data_error(&err, "failed to load log content"))
}

pub(crate) async fn delete_log_content(
    State(state): State<Arc<ApiState>>,
    Path(log_id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state
        .log_contents
        .delete_by_log_id(log_id)
        .await
        .map_err(|err| map_data_error(&err, "failed to delete log content"))?;
    Ok(Json(DeletedResponse { deleted }))
}

pub(crate) async fn prune_log_content(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<PruneQuery>, QueryRejection>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let limit = query.limit.unwrap_or(DEFAULT_PRUNE_LIMIT);
    if limit <= 0 {
        return Err(ApiError::bad_request("limit must be positive"));
    }

    let deleted = state
        .log_contents
        .delete_older_than(query.before, limit)
        .await
        .map_err(|err| map_data_error(&err, "failed to prune log content"))?;
    state.telemetry.add_log_content_pruned(deleted);
    info!(before = query.before, limit, deleted, "log content pruned");
    Ok(Json(DeletedResponse { deleted }))
}
