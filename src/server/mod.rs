//! Server module
//!
//! TCP listener creation, per-connection HTTP serving, the accept loop,
//! and signal-driven graceful shutdown.

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module file keeps a different name
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used entry points
pub use listener::create_listener;
pub use server_loop::run_server_loop;
