//! HTTP response building module
//!
//! Builders for the three response shapes the handler can produce:
//! asset success, not-found page, and the 500 error of last resort.

use crate::store::Asset;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 200 response for a served asset
pub fn build_asset_response(asset: &Asset, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = asset.body.len();
    let body = if is_head {
        Bytes::new()
    } else {
        asset.body.clone()
    };

    Response::builder()
        .status(200)
        .header("Content-Type", asset.content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 response carrying the custom not-found page
pub fn build_not_found_response(page: &Asset, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = page.body.len();
    let body = if is_head {
        Bytes::new()
    } else {
        page.body.clone()
    };

    Response::builder()
        .status(404)
        .header("Content-Type", page.content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 500 response with the given message body
pub fn build_error_response(message: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(message.to_string())))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
