//! Response header middleware.

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CACHE_CONTROL,
};
use axum::http::{HeaderMap, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// Responses reflect live data; no intermediary may keep them.
pub const NO_STORE: &str = "no-store, no-cache, must-revalidate, max-age=0";

fn insert_cors(headers: &mut HeaderMap) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

/// Answer every OPTIONS request with CORS headers and an empty body, and stamp
/// CORS plus no-store headers on everything else.
pub async fn cors_and_cache(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut resp = Response::new(Body::empty());
        insert_cors(resp.headers_mut());
        return resp;
    }

    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();
    insert_cors(headers);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    resp
}
