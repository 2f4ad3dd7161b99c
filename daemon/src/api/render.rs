use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use modelhub_core::Artifact;
use tokio_util::io::ReaderStream;
use tower_http::cors::{Any, CorsLayer};

use super::error::ApiError;
use crate::auth::API_KEY_HEADER;

/// Methods advertised on every response
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";

/// Request headers advertised on every response
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-API-Key";

/// Permissive CORS: any origin may read responses and send the key headers.
///
/// The layer fills in the method and header lists on preflights only; `app`
/// adds [`ALLOW_METHODS`] and [`ALLOW_HEADERS`] to all other responses.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(API_KEY_HEADER),
        ])
}

/// The CORS layer answers preflights with 200; report them as 204 No Content.
pub async fn preflight_no_content(request: Request, next: Next) -> Response {
    let preflight = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;

    if preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

/// Stream an artifact as an attachment with explicit length framing.
pub fn attachment(artifact: Artifact, content_type: &str) -> Result<Response, ApiError> {
    let content_type = HeaderValue::from_str(content_type)
        .map_err(|_| ApiError::Internal(format!("Invalid content type '{}'", content_type)))?;
    let disposition = content_disposition(&artifact.file_name)?;

    let headers = [
        (header::CONTENT_TYPE, content_type),
        (header::CONTENT_LENGTH, HeaderValue::from(artifact.info.size_bytes)),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    let body = Body::from_stream(ReaderStream::new(artifact.file));

    Ok((headers, body).into_response())
}

fn content_disposition(file_name: &str) -> Result<HeaderValue, ApiError> {
    let safe: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", safe))
        .map_err(|e| ApiError::Internal(format!("Invalid file name '{}': {}", file_name, e)))
}
