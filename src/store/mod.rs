//! Asset store module
//!
//! An in-process key-value store for static assets. The backing directory
//! is snapshotted into memory at startup; lookups resolve a request path
//! through the default request-to-asset mapping (or a per-request
//! override) and an optional manifest before hitting the store.

mod error;
mod kv;

pub use error::AssetError;
pub use kv::{Asset, CacheMode, KvAssetStore, LookupOptions};
