// Webhook delivery
//
//   schemas     – fixed-field JSON payload sent per event
//   http_client – bounded-timeout POST, non-2xx is an error
//   forwarder   – `EventSink` turning events into webhook calls

pub mod forwarder;
pub mod http_client;
pub mod schemas;

// Re-export commonly used types
pub use forwarder::EventForwarder;
pub use http_client::{HttpClientError, WebhookHttpClient, parse_webhook_url};
pub use schemas::{EVENT_TYPE, ForwardPayload, SCHEMA_VERSION};
