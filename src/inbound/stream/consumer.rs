use async_trait::async_trait;
use futures::StreamExt;
use tonic::Request;
use tonic::transport::{ClientTlsConfig, Endpoint};
use tracing::{debug, info};

use super::proto::{self, EventStreamClient};
use crate::config::StreamConfig;
use crate::domain::{AuthCredential, Event, EventSource, EventStream};
use crate::error::RelayError;

/// Opens the vendor's `Listen` stream over a fresh gRPC channel per attempt.
///
/// No retries happen here; a failed open or a broken stream is reported to
/// the caller as-is.
#[derive(Debug, Clone)]
pub struct GrpcEventSource {
    endpoint: Endpoint,
}

impl GrpcEventSource {
    pub fn new(config: &StreamConfig) -> Result<Self, RelayError> {
        let mut endpoint = Endpoint::from_shared(config.endpoint.clone())
            .map_err(|e| {
                RelayError::UnexpectedFailure(format!(
                    "Invalid stream endpoint {}: {e}",
                    config.endpoint
                ))
            })?
            .http2_keep_alive_interval(config.keepalive_interval())
            .keep_alive_while_idle(true);

        // The service uses server-side TLS only; no client certificate.
        if config.endpoint.starts_with("https://") {
            endpoint = endpoint.tls_config(ClientTlsConfig::new().with_webpki_roots())?;
        }

        Ok(Self { endpoint })
    }

    pub fn uri(&self) -> String {
        self.endpoint.uri().to_string()
    }
}

#[async_trait]
impl EventSource for GrpcEventSource {
    async fn open(&self, credential: &AuthCredential) -> Result<EventStream, RelayError> {
        debug!(endpoint = %self.endpoint.uri(), "Connecting to event stream");
        let channel = self.endpoint.connect().await?;

        let mut client = EventStreamClient::new(channel);
        let response = client
            .listen(Request::new(proto::Auth::from(credential)))
            .await?;

        info!(
            endpoint = %self.endpoint.uri(),
            expiration = %credential.expiration,
            "Event stream opened"
        );

        let events = response
            .into_inner()
            .map(|item| item.map(Event::from).map_err(RelayError::from));

        Ok(Box::pin(events))
    }
}
