//! Error handling middleware
//!
//! Any 5xx response leaving the router has its body replaced with the
//! generic unexpected-error JSON, so panics caught upstream, layer failures
//! and handler bugs never leak internal detail. A plain-text 413 from the
//! body limit is rewritten to the JSON error shape. Other 4xx bodies pass
//! through.

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

use crate::api::errors::{ApiError, UNEXPECTED_ERROR_MESSAGE};

/// Error handling middleware layer
#[derive(Clone, Default)]
pub struct ErrorHandlingLayer;

impl<S> tower::Layer<S> for ErrorHandlingLayer
where
    S: tower::Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Service = ErrorHandlingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorHandlingService { inner }
    }
}

/// Error handling service wrapper
#[derive(Clone)]
pub struct ErrorHandlingService<S> {
    inner: S,
}

impl<S> tower::Service<Request> for ErrorHandlingService<S>
where
    S: tower::Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let uri = req.uri().clone();
            let method = req.method().clone();

            let response = inner.call(req).await?;

            if response.status().is_server_error() {
                Ok(genericize_server_error(response, &uri, &method))
            } else if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json(&response) {
                debug!(method = %method, uri = %uri, "Request body over limit");
                Ok(json_payload_too_large(response))
            } else {
                Ok(response)
            }
        })
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// Keep status and headers, swap the plain-text body for the JSON error
fn json_payload_too_large(response: Response) -> Response {
    let (mut parts, _) = response.into_parts();
    let (_, body) = ApiError::payload_too_large().into_response().into_parts();

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Response::from_parts(parts, body)
}

/// Keep status and headers, swap the body for the generic error JSON
fn genericize_server_error(response: Response, uri: &Uri, method: &Method) -> Response {
    let (mut parts, _) = response.into_parts();

    error!(
        method = %method,
        uri = %uri,
        status = parts.status.as_u16(),
        "Request failed with server error"
    );

    let body = json!({
        "success": false,
        "error": UNEXPECTED_ERROR_MESSAGE,
    })
    .to_string();

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Response::from_parts(parts, Body::from(body))
}

/// Create error handling middleware
pub fn create_error_handling_middleware() -> ErrorHandlingLayer {
    ErrorHandlingLayer
}
