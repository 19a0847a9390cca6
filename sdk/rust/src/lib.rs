//! Client SDK for the summarize gateway.

pub mod client;

pub use client::{GatewayClient, GatewayReply, SdkError, SummarizeRequest};
