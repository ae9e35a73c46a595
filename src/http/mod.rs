//! HTTP protocol layer module
//!
//! Header policy, MIME detection, and response builders, decoupled from
//! the asset-serving business logic.

pub mod headers;
pub mod mime;
pub mod response;

pub use headers::decorate;
pub use response::{build_asset_response, build_error_response, build_not_found_response};
