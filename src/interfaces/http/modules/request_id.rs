//! Request ID middleware
//!
//! Assigns a `X-Request-Id` UUID to every HTTP request, carries it in a
//! `tracing::Span` so downstream logs correlate, and echoes it back in
//! the response header.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for the request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuses an incoming `X-Request-Id` or generates a fresh UUID v4,
/// stores it in request extensions, and wraps the request in a
/// `tracing` span carrying the ID.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
    );

    // The span must follow the future across await points, so it is
    // attached with `instrument` rather than entered on this task.
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// New-type wrapper for the request ID, stored in request extensions.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{middleware, Extension, Router};

    async fn handler(Extension(id): Extension<RequestId>) -> String {
        id.0
    }

    fn app() -> Router {
        Router::new()
            .route("/test", get(handler))
            .layer(middleware::from_fn(request_id_middleware))
    }

    async fn send(req: Request<Body>) -> Response {
        use tower::Service;
        let mut svc = app().into_service();
        svc.call(req).await.unwrap()
    }

    #[tokio::test]
    async fn generates_id_and_echoes_header() {
        let req = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let resp = send(req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let id = resp.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn reuses_incoming_id() {
        let req = Request::builder()
            .uri("/test")
            .header(REQUEST_ID_HEADER, "trace-abc")
            .body(Body::empty())
            .unwrap();
        let resp = send(req).await;

        assert_eq!(
            resp.headers().get(REQUEST_ID_HEADER).unwrap(),
            "trace-abc"
        );
    }
}
