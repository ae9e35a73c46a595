//! Request handler module
//!
//! Maps each incoming request to a served asset, decorates the response
//! with cache and security headers, and degrades through the not-found
//! page to a 500 when the store fails.

pub mod assets;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
