//! Runtime option endpoints.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tollgate_config::{ConfigError, OptionEntry};
use tollgate_telemetry::OptionUpdateOutcome;
use tracing::info;

use crate::http::errors::{ApiError, map_config_error};
use crate::models::{OptionUpdateRequest, OptionUpdateResponse};
use crate::state::ApiState;

pub(crate) async fn list_options(State(state): State<Arc<ApiState>>) -> Json<Vec<OptionEntry>> {
    Json(state.options.export().await)
}

pub(crate) async fn update_option(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<OptionUpdateRequest>, JsonRejection>,
) -> Result<Json<OptionUpdateResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    if request.key.trim().is_empty() {
        return Err(ApiError::bad_request("option key must not be empty"));
    }

    match state.options.set_validated(&request.key, request.value).await {
        Ok(value) => {
            state.telemetry.inc_option_update(OptionUpdateOutcome::Applied);
            info!(key = %request.key, "option updated");
            Ok(Json(OptionUpdateResponse {
                key: request.key,
                value,
            }))
        }
        Err(err) => {
            let outcome = match err {
                ConfigError::ValidationFailed { .. } => OptionUpdateOutcome::Rejected,
                _ => OptionUpdateOutcome::PersistFailed,
            };
            state.telemetry.inc_option_update(outcome);
            Err(map_config_error(err))
        }
    }
}
