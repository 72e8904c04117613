//! Per-request accounting: request context scoping and route/status counters.

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tollgate_telemetry::{Metrics, with_request_context};

use crate::http::constants::HEADER_REQUEST_ID;

/// Run the handler inside the request context and count the outcome under its
/// matched route.
pub(crate) async fn track_request(
    State(telemetry): State<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let route = request.extensions().get::<MatchedPath>().map_or_else(
        || request.uri().path().to_owned(),
        |matched| matched.as_str().to_owned(),
    );
    let request_id = request
        .headers()
        .get(HEADER_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let response = with_request_context(request_id, route.clone(), next.run(request)).await;
    telemetry.inc_http_request(&route, response.status().as_u16());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use tollgate_telemetry::current_request_id;
    use tower::ServiceExt;

    async fn echo_request_id(Path(id): Path<u32>) -> (StatusCode, String) {
        let status = if id == 0 {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::OK
        };
        (status, current_request_id().unwrap_or_default())
    }

    #[tokio::test]
    async fn handlers_see_request_id_and_routes_are_counted() -> Result<()> {
        let telemetry = Metrics::new()?;
        let router = Router::new()
            .route("/items/{id}", get(echo_request_id))
            .route_layer(from_fn_with_state(telemetry.clone(), track_request));

        let request = axum::http::Request::builder()
            .uri("/items/7")
            .header(HEADER_REQUEST_ID, "req-items")
            .body(Body::empty())?;
        let response = router.clone().oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(&body[..], b"req-items");

        let missing = axum::http::Request::builder()
            .uri("/items/0")
            .body(Body::empty())?;
        assert_eq!(router.oneshot(missing).await?.status(), StatusCode::NOT_FOUND);

        let rendered = telemetry.render()?;
        let line = rendered
            .lines()
            .find(|line| line.starts_with("http_requests_total") && line.contains("404"))
            .unwrap_or_default();
        assert!(line.contains(r#"route="/items/{id}""#), "{rendered}");
        Ok(())
    }
}
