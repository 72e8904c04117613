//! RFC9457-style API error wrapper.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tollgate_config::ConfigError;
use tollgate_data::DataError;
use tollgate_telemetry::{current_request_id, current_route};
use tracing::error;

use crate::http::constants::{
    PROBLEM_BAD_REQUEST, PROBLEM_CONFIG_INVALID, PROBLEM_FORBIDDEN, PROBLEM_INTERNAL,
    PROBLEM_NOT_FOUND,
};
use crate::models::{ProblemDetails, ProblemInvalidParam};

/// Structured API error with optional RFC9457 fields.
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    pub(crate) kind: &'static str,
    title: &'static str,
    detail: Option<String>,
    pub(crate) invalid_params: Option<Vec<ProblemInvalidParam>>,
}

impl ApiError {
    const fn new(status: StatusCode, kind: &'static str, title: &'static str) -> Self {
        Self {
            status,
            kind,
            title,
            detail: None,
            invalid_params: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub(crate) fn with_invalid_params(mut self, params: Vec<ProblemInvalidParam>) -> Self {
        self.invalid_params = Some(params);
        self
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            PROBLEM_INTERNAL,
            "internal server error",
        )
        .with_detail(message)
    }

    pub(crate) fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, PROBLEM_FORBIDDEN, "forbidden").with_detail(detail)
    }

    pub(crate) fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, PROBLEM_BAD_REQUEST, "bad request").with_detail(detail)
    }

    pub(crate) fn not_found(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            PROBLEM_NOT_FOUND,
            "resource not found",
        )
        .with_detail(detail)
    }

    pub(crate) fn config_invalid(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            PROBLEM_CONFIG_INVALID,
            "configuration invalid",
        )
        .with_detail(detail)
    }
}

/// Translate store errors into problem responses.
pub(crate) fn map_config_error(err: ConfigError) -> ApiError {
    match err {
        ConfigError::ValidationFailed { key, reason } => ApiError::config_invalid(reason.clone())
            .with_invalid_params(vec![ProblemInvalidParam {
                pointer: "/value".to_string(),
                message: format!("{key}: {reason}"),
            }]),
        ConfigError::PersistenceFailed { key, source } => {
            let request_id = current_request_id();
            error!(
                key = %key,
                error = %source,
                request_id = request_id.as_deref(),
                "option write was not persisted"
            );
            ApiError::internal("option applied but could not be persisted")
        }
        other => {
            let request_id = current_request_id();
            error!(
                error = %other,
                request_id = request_id.as_deref(),
                "option write failed"
            );
            ApiError::internal("failed to update option")
        }
    }
}

/// Translate data-layer errors into problem responses.
pub(crate) fn map_data_error(err: &DataError, context: &'static str) -> ApiError {
    if err.is_not_found() {
        return ApiError::not_found("log content not found");
    }
    let request_id = current_request_id();
    let route = current_route();
    error!(
        error = %err,
        context,
        request_id = request_id.as_deref(),
        route = route.as_deref(),
        "log content operation failed"
    );
    ApiError::internal(context)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            invalid_params: self.invalid_params,
            instance: current_route(),
            request_id: current_request_id(),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use tollgate_config::SinkError;
    use tollgate_telemetry::with_request_context;

    async fn problem_of(err: ApiError) -> ProblemDetails {
        let body = to_bytes(err.into_response().into_body(), usize::MAX)
            .await
            .expect("problem body");
        serde_json::from_slice(&body).expect("problem json")
    }

    #[tokio::test]
    async fn problems_carry_the_active_request_context() {
        let problem = with_request_context("req-7", "/api/log/{log_id}/content", async {
            problem_of(ApiError::not_found("log content not found")).await
        })
        .await;
        assert_eq!(problem.request_id.as_deref(), Some("req-7"));
        assert_eq!(problem.instance.as_deref(), Some("/api/log/{log_id}/content"));

        let detached = problem_of(ApiError::bad_request("nope")).await;
        assert!(detached.request_id.is_none());
        assert!(detached.instance.is_none());
    }

    #[test]
    fn validation_failure_maps_to_unprocessable() {
        let err = map_config_error(ConfigError::ValidationFailed {
            key: "GroupRatio".into(),
            reason: "expected `,` or `}`".into(),
        });
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.kind, PROBLEM_CONFIG_INVALID);
        let params = err.invalid_params.expect("invalid params");
        assert_eq!(params[0].pointer, "/value");
        assert!(params[0].message.starts_with("GroupRatio: "));
    }

    #[test]
    fn persistence_failure_maps_to_internal() {
        let err = map_config_error(ConfigError::PersistenceFailed {
            key: "Notice".into(),
            source: SinkError::new("offline"),
        });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.invalid_params.is_none());
    }

    #[test]
    fn missing_content_maps_to_not_found() {
        let err = map_data_error(
            &DataError::NotFound {
                operation: "get log content",
            },
            "failed to load log content",
        );
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
