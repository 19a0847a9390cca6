//! Observability subsystem.
//!
//! Structured logging through `tracing`. Request spans come from
//! `tower_http::trace::TraceLayer` and carry the request id.

pub mod logging;

pub use logging::init_logging;
