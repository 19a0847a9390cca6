//! Summarize gateway library.

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use gateway::{Gateway, GatewayError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
