//! Router construction and server host for the API.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    middleware,
    http::{Method, Request, header::CONTENT_TYPE},
    routing::{delete, get},
};
use tokio::net::TcpListener;
use tollgate_config::OptionStore;
use tollgate_telemetry::{Metrics, build_sha};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::error::{ApiServerError, ApiServerResult};
use crate::facade::SharedLogContents;
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::health::{health, metrics};
use crate::http::log_content::{delete_log_content, get_log_content, prune_log_content};
use crate::http::options::{list_options, update_option};
use crate::http::system::{SystemInfo, database, env_variables};
use crate::http::telemetry::track_request;
use crate::state::ApiState;

/// Axum router wrapper that hosts the administrative API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct the API with its shared dependencies wired through application state.
    #[must_use]
    pub fn new(
        options: OptionStore,
        log_contents: SharedLogContents,
        telemetry: Metrics,
        system: SystemInfo,
    ) -> Self {
        let state = Arc::new(ApiState::new(
            options,
            log_contents,
            telemetry.clone(),
            system,
        ));
        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(tollgate_telemetry::propagate_request_id_layer())
            .layer(tollgate_telemetry::set_request_id_layer())
            .layer(trace_layer)
            .layer(middleware::from_fn_with_state(telemetry, track_request));

        let router = Self::build_router()
            .layer(cors_layer)
            .route_layer(layered)
            .with_state(state);

        Self { router }
    }

    fn build_router() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route("/api/option", get(list_options).put(update_option))
            .route("/api/log/content", delete(prune_log_content))
            .route(
                "/api/log/{log_id}/content",
                get(get_log_content).delete(delete_log_content),
            )
            .route("/api/status/env", get(env_variables))
            .route("/api/status/database", get(database))
    }

    /// Serve the API on `addr` until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve<F>(self, addr: SocketAddr, shutdown: F) -> ApiServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        tracing::info!(%addr, "starting api");
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }

    #[cfg(test)]
    pub(crate) fn router(&self) -> Router {
        self.router.clone()
    }
}
