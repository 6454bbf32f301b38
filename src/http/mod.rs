//! HTTP server module.
//!
//! Binds the configured address, serves the router over plain HTTP, and
//! drains in-flight requests on SIGTERM/SIGINT. TLS is expected to be
//! terminated by the platform in front of the service.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
pub use shutdown::shutdown_signal;
