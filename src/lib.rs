//! Relays events from an authenticated gRPC stream to an HTTP webhook,
//! reconnecting with capped exponential backoff whenever the stream or the
//! webhook fails.

pub mod config;
pub mod domain;
pub mod error;
pub mod inbound;
pub mod outbound;
pub mod relay;
pub mod server;
pub mod telemetry;
