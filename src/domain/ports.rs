/*
   Seams between the reconnect supervisor and the outside world: where events
   come from, and where they go.
*/

use crate::domain::credential::AuthCredential;
use crate::domain::events::Event;
use crate::error::RelayError;
use async_trait::async_trait;
use std::pin::Pin;
use tokio_stream::Stream;

/// Lazily produced, non-restartable sequence of inbound events.
///
/// The stream ends when the server closes it; transport errors arrive as
/// `Err` items.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<Event, RelayError>> + Send>>;

/// Opens an authenticated event stream.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn open(&self, credential: &AuthCredential) -> Result<EventStream, RelayError>;
}

/// Delivers a single event downstream.
///
/// A failure is final for that event: implementations do not retry.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn forward(&self, event: &Event) -> Result<(), RelayError>;
}
