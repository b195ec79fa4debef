//! Redirect response construction.

use axum::body::Body;
use axum::http::header::{self, HeaderValue, InvalidHeaderValue};
use axum::http::StatusCode;
use axum::response::Response;

use crate::config::RedirectBody;

/// `301 Moved Permanently` to `location` with an HTML content type.
pub fn redirect_response(location: &str, body: &RedirectBody) -> Result<Response, InvalidHeaderValue> {
    let location = HeaderValue::from_str(location)?;

    let mut response = Response::new(Body::from(body.render()));
    *response.status_mut() = StatusCode::MOVED_PERMANENTLY;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
    headers.insert(header::LOCATION, location);

    Ok(response)
}
