use async_trait::async_trait;
use reqwest::Url;
use time::OffsetDateTime;
use tracing::{error, info};

use super::http_client::{HttpClientError, WebhookHttpClient, parse_webhook_url};
use super::schemas::ForwardPayload;
use crate::config::WebhookConfig;
use crate::domain::{Event, EventSink};
use crate::error::RelayError;

/// Posts each event to the webhook, one request per event.
///
/// There is no per-event retry. A failure is returned to the caller, which
/// abandons the current stream and reconnects.
#[derive(Debug, Clone)]
pub struct EventForwarder {
    http_client: WebhookHttpClient,
    webhook_url: Url,
}

impl EventForwarder {
    pub fn new(config: &WebhookConfig) -> Result<Self, HttpClientError> {
        let webhook_url = parse_webhook_url(&config.url)?;
        let http_client = WebhookHttpClient::with_timeout(config.timeout())?;

        Ok(Self {
            http_client,
            webhook_url,
        })
    }

    pub fn webhook_url(&self) -> &Url {
        &self.webhook_url
    }
}

#[async_trait]
impl EventSink for EventForwarder {
    async fn forward(&self, event: &Event) -> Result<(), RelayError> {
        // Stamped here rather than on receipt
        let payload = ForwardPayload::new(event, OffsetDateTime::now_utc());
        let body = payload.to_json().map_err(|e| {
            RelayError::UnexpectedFailure(format!("Failed to serialise payload: {e}"))
        })?;

        match self.http_client.post_json(&self.webhook_url, body).await {
            Ok((status_code, response_time_ms)) => {
                info!(
                    session = %event.session,
                    subtype = %event.variant,
                    status_code = status_code,
                    response_time_ms = response_time_ms,
                    "Event forwarded to webhook"
                );
                Ok(())
            }
            Err(e) => {
                match &e {
                    HttpClientError::ResponseError { status, body } => error!(
                        session = %event.session,
                        status = %status.as_u16(),
                        body = %body,
                        "Webhook rejected event"
                    ),
                    other => error!(
                        session = %event.session,
                        error = %other,
                        "Error sending event to webhook"
                    ),
                }
                Err(RelayError::from(e))
            }
        }
    }
}
