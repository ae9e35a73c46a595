//! Asset serving module
//!
//! The fallback chain for one request: primary store lookup, then the
//! custom not-found page, then a bare 500. Every outcome leaves through
//! the same header decoration.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{headers, response};
use crate::logger;
use crate::store::{Asset, AssetError, KvAssetStore, LookupOptions};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

/// Serve one request against the asset store.
///
/// Exactly one response comes back, with status 2xx, 404, or 500.
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let mut response = match fetch_asset(ctx, state).await {
        Ok(asset) => response::build_asset_response(&asset, ctx.is_head),
        Err(err) => fallback(ctx, state, &err).await,
    };
    headers::decorate(&mut response, ctx.path);
    response
}

/// Primary lookup: method gate, mapping override, store fetch.
async fn fetch_asset(ctx: &RequestContext<'_>, state: &AppState) -> Result<Asset, AssetError> {
    if !matches!(*ctx.method, Method::GET | Method::HEAD) {
        return Err(AssetError::MethodNotAllowed {
            method: ctx.method.to_string(),
        });
    }

    let options = LookupOptions {
        map_request: Some(&map_to_root_index),
        cache_mode: state.cache_mode(),
    };
    state.store.get(ctx.path, &options).await
}

/// Mapping override for the primary lookup.
///
/// Runs the store's default mapping first; any key ending in
/// `/index.html` is rewritten to the root-level `/index.html`, which is
/// the only copy the store holds. Non-HTML assets pass through untouched.
fn map_to_root_index(path: &str) -> String {
    let key = KvAssetStore::map_request_to_asset(path);
    if key.ends_with("/index.html") {
        "/index.html".to_string()
    } else {
        key
    }
}

/// Degraded paths after a failed primary lookup.
///
/// Debug mode returns the raw error as a 500 and never consults the
/// not-found page. Otherwise the page is fetched and served with status
/// forced to 404; if that lookup fails too it is swallowed and the
/// generic 500 goes out.
async fn fallback(
    ctx: &RequestContext<'_>,
    state: &AppState,
    err: &AssetError,
) -> Response<Full<Bytes>> {
    if state.config.assets.debug {
        return response::build_error_response(&err.to_string());
    }

    if !err.is_not_found() {
        logger::log_warning(&format!("Asset lookup failed for {}: {err}", ctx.path));
    }

    match fetch_not_found_page(state).await {
        Ok(page) => response::build_not_found_response(&page, ctx.is_head),
        Err(_) => response::build_error_response("Internal Error"),
    }
}

/// Fetch the configured not-found page, ignoring the original path.
async fn fetch_not_found_page(state: &AppState) -> Result<Asset, AssetError> {
    let mapper = |_: &str| state.config.assets.not_found_page.clone();
    let options = LookupOptions {
        map_request: Some(&mapper),
        cache_mode: state.cache_mode(),
    };
    state.store.get("", &options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AssetsConfig, Config, LoggingConfig, PerformanceConfig, ServerConfig,
    };
    use crate::http::headers::{CACHE_IMMUTABLE, CACHE_REVALIDATE};
    use http_body_util::BodyExt;

    fn test_config(debug: bool) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                show_headers: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
            assets: AssetsConfig {
                root: "public".to_string(),
                not_found_page: "/404.html".to_string(),
                manifest: None,
                debug,
            },
        }
    }

    fn asset(body: &str, content_type: &'static str) -> Asset {
        Asset {
            body: Bytes::from(body.to_string()),
            content_type,
        }
    }

    fn site_state() -> AppState {
        let store = KvAssetStore::from_entries([
            (
                "/index.html".to_string(),
                asset("<h1>home</h1>", "text/html; charset=utf-8"),
            ),
            (
                "/js/app.js".to_string(),
                asset("console.log(1)", "application/javascript"),
            ),
            (
                "/404.html".to_string(),
                asset("<h1>missing</h1>", "text/html; charset=utf-8"),
            ),
        ]);
        AppState::new(test_config(false), store)
    }

    fn ctx<'a>(path: &'a str, method: &'a Method) -> RequestContext<'a> {
        RequestContext {
            path,
            method,
            is_head: *method == Method::HEAD,
        }
    }

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn assert_security_headers(response: &Response<Full<Bytes>>) {
        let headers = response.headers();
        assert_eq!(headers["X-Frame-Options"], "DENY");
        assert_eq!(headers["X-Content-Type-Options"], "nosniff");
        assert_eq!(headers["X-XSS-Protection"], "1; mode=block");
        assert_eq!(headers["Referrer-Policy"], "no-referrer");
    }

    #[tokio::test]
    async fn test_hashed_asset_is_immutable() {
        let state = site_state();
        let response = serve(&ctx("/js/app.js", &Method::GET), &state).await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Cache-Control"], CACHE_IMMUTABLE);
        assert_eq!(
            response.headers()["Content-Type"],
            "application/javascript"
        );
        assert_security_headers(&response);
        assert_eq!(body_text(response).await, "console.log(1)");
    }

    #[tokio::test]
    async fn test_page_must_revalidate() {
        let state = site_state();
        let response = serve(&ctx("/", &Method::GET), &state).await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Cache-Control"], CACHE_REVALIDATE);
        assert_security_headers(&response);
        assert_eq!(body_text(response).await, "<h1>home</h1>");
    }

    #[tokio::test]
    async fn test_nested_index_rewrites_to_root() {
        let state = site_state();

        let explicit = serve(&ctx("/some/dir/index.html", &Method::GET), &state).await;
        assert_eq!(explicit.status(), 200);
        assert_eq!(body_text(explicit).await, "<h1>home</h1>");

        let directory = serve(&ctx("/docs/", &Method::GET), &state).await;
        assert_eq!(directory.status(), 200);
        assert_eq!(body_text(directory).await, "<h1>home</h1>");
    }

    #[tokio::test]
    async fn test_missing_asset_serves_not_found_page() {
        let state = site_state();
        let response = serve(&ctx("/nope.css", &Method::GET), &state).await;

        assert_eq!(response.status(), 404);
        assert_security_headers(&response);
        assert_eq!(response.headers()["Cache-Control"], CACHE_REVALIDATE);
        assert_eq!(body_text(response).await, "<h1>missing</h1>");
    }

    #[tokio::test]
    async fn test_missing_not_found_page_degrades_to_500() {
        let store = KvAssetStore::from_entries(Vec::new());
        let state = AppState::new(test_config(false), store);
        let response = serve(&ctx("/nope.css", &Method::GET), &state).await;

        assert_eq!(response.status(), 500);
        assert_security_headers(&response);
        assert_eq!(body_text(response).await, "Internal Error");
    }

    #[tokio::test]
    async fn test_method_not_allowed_enters_fallback() {
        let state = site_state();
        let response = serve(&ctx("/index.html", &Method::POST), &state).await;

        assert_eq!(response.status(), 404);
        assert_eq!(body_text(response).await, "<h1>missing</h1>");
    }

    #[tokio::test]
    async fn test_debug_exposes_raw_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = KvAssetStore::load(dir.path(), None).await.unwrap();
        let state = AppState::new(test_config(true), store);

        let response = serve(&ctx("/missing.txt", &Method::GET), &state).await;
        assert_eq!(response.status(), 500);
        assert_security_headers(&response);
        assert_eq!(body_text(response).await, "asset not found: /missing.txt");
    }

    #[tokio::test]
    async fn test_debug_skips_not_found_page() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("404.html"), "<h1>missing</h1>").unwrap();
        let store = KvAssetStore::load(dir.path(), None).await.unwrap();
        let state = AppState::new(test_config(true), store);

        let response = serve(&ctx("/missing.txt", &Method::GET), &state).await;
        assert_eq!(response.status(), 500);
    }

    #[tokio::test]
    async fn test_debug_bypass_serves_fresh_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("note.txt"), "v1").unwrap();
        let store = KvAssetStore::load(dir.path(), None).await.unwrap();
        let state = AppState::new(test_config(true), store);

        std::fs::write(dir.path().join("note.txt"), "v2").unwrap();
        let response = serve(&ctx("/note.txt", &Method::GET), &state).await;
        assert_eq!(response.status(), 200);
        assert_eq!(body_text(response).await, "v2");
    }

    #[tokio::test]
    async fn test_head_keeps_headers_drops_body() {
        let state = site_state();
        let get = serve(&ctx("/", &Method::GET), &state).await;
        let head = serve(&ctx("/", &Method::HEAD), &state).await;

        assert_eq!(head.status(), get.status());
        assert_eq!(head.headers(), get.headers());
        assert_eq!(body_text(head).await, "");
    }

    #[tokio::test]
    async fn test_repeat_requests_are_identical() {
        let state = site_state();
        let first = serve(&ctx("/js/app.js", &Method::GET), &state).await;
        let second = serve(&ctx("/js/app.js", &Method::GET), &state).await;

        assert_eq!(first.status(), second.status());
        assert_eq!(first.headers(), second.headers());
    }
}
