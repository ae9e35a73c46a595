//! kvserve - a key-value backed static asset server
//!
//! The configured asset root is snapshotted into an in-memory key-value
//! store at startup (key = URL path, value = body bytes + content type).
//! Each request is mapped to a store key, fetched, and decorated with
//! cache and security headers. Missing assets fall back to a custom
//! `/404.html` page; any other failure yields a 500.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod store;
