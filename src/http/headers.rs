//! Response header policy
//!
//! Every response leaves the server with a Cache-Control header computed
//! from the request path plus a fixed set of security headers. The list
//! is exhaustive: no ETag, no Range, no conditional handling.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::Response;

/// Cache-Control for content-hashed assets, safe to cache indefinitely.
pub const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Cache-Control for everything else.
pub const CACHE_REVALIDATE: &str = "must-revalidate";

/// Security headers attached to every response, success or failure.
pub const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("X-Frame-Options", "DENY"),
    ("X-Content-Type-Options", "nosniff"),
    ("X-XSS-Protection", "1; mode=block"),
    ("Referrer-Policy", "no-referrer"),
];

/// Path segments that hold content-hashed build output.
const HASHED_SEGMENTS: [&str; 3] = ["js", "css", "img"];

/// Pick the Cache-Control value for a request path.
///
/// Matches on whole path segments, not substrings: `/js/app.js` is
/// immutable, `/jsx/app.js` is not.
pub fn cache_control_for_path(path: &str) -> &'static str {
    let hashed = path
        .split('/')
        .any(|segment| HASHED_SEGMENTS.contains(&segment));
    if hashed {
        CACHE_IMMUTABLE
    } else {
        CACHE_REVALIDATE
    }
}

/// Append the cache and security headers to a response in place.
pub fn decorate(response: &mut Response<Full<Bytes>>, path: &str) {
    let headers = response.headers_mut();
    headers.insert(
        "Cache-Control",
        HeaderValue::from_static(cache_control_for_path(path)),
    );
    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashed_segments_are_immutable() {
        assert_eq!(cache_control_for_path("/js/app.js"), CACHE_IMMUTABLE);
        assert_eq!(cache_control_for_path("/static/css/site.css"), CACHE_IMMUTABLE);
        assert_eq!(cache_control_for_path("/img/logo.png"), CACHE_IMMUTABLE);
        assert_eq!(cache_control_for_path("/a/b/img/c/d.webp"), CACHE_IMMUTABLE);
    }

    #[test]
    fn test_other_paths_revalidate() {
        assert_eq!(cache_control_for_path("/"), CACHE_REVALIDATE);
        assert_eq!(cache_control_for_path("/index.html"), CACHE_REVALIDATE);
        assert_eq!(cache_control_for_path("/docs/guide"), CACHE_REVALIDATE);
    }

    #[test]
    fn test_segment_equality_not_substring() {
        assert_eq!(cache_control_for_path("/jsx/app.js"), CACHE_REVALIDATE);
        assert_eq!(cache_control_for_path("/mycss/site.css"), CACHE_REVALIDATE);
        assert_eq!(cache_control_for_path("/imgs/logo.png"), CACHE_REVALIDATE);
    }

    #[test]
    fn test_decorate_sets_all_headers() {
        let mut response = Response::new(Full::new(Bytes::new()));
        decorate(&mut response, "/css/site.css");

        let headers = response.headers();
        assert_eq!(headers["Cache-Control"], CACHE_IMMUTABLE);
        assert_eq!(headers["X-Frame-Options"], "DENY");
        assert_eq!(headers["X-Content-Type-Options"], "nosniff");
        assert_eq!(headers["X-XSS-Protection"], "1; mode=block");
        assert_eq!(headers["Referrer-Policy"], "no-referrer");
    }
}
