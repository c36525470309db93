//! Wire messages and client for the `event_stream.EventStream` service.
//!
//! Declared with `prost` derives to match `proto/event_stream.proto`, so the
//! build does not depend on `protoc`.

use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{Request, Response, Status, Streaming};

use crate::domain::{self, AuthCredential, EventVariant};

pub const LISTEN_PATH: &str = "/event_stream.EventStream/Listen";

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Auth {
    #[prost(string, tag = "1")]
    pub expiration: String,
    #[prost(string, tag = "2")]
    pub access_key: String,
    #[prost(string, tag = "3")]
    pub signature: String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Start {}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct End {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Event {
    #[prost(string, tag = "1")]
    pub session: String,
    #[prost(int64, tag = "2")]
    pub timestamp: i64,
    #[prost(oneof = "event::Data", tags = "3, 4")]
    pub data: Option<event::Data>,
}

pub mod event {
    #[derive(Clone, Copy, PartialEq, ::prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "3")]
        Start(super::Start),
        #[prost(message, tag = "4")]
        End(super::End),
    }
}

impl From<&AuthCredential> for Auth {
    fn from(credential: &AuthCredential) -> Self {
        Self {
            expiration: credential.expiration.clone(),
            access_key: credential.access_key.clone(),
            signature: credential.signature.clone(),
        }
    }
}

impl From<Event> for domain::Event {
    fn from(message: Event) -> Self {
        let variant = match message.data {
            Some(event::Data::Start(_)) => EventVariant::Start,
            Some(event::Data::End(_)) => EventVariant::End,
            None => EventVariant::Unknown,
        };

        domain::Event::new(message.session, message.timestamp, variant)
    }
}

/// Client for the server-streaming `Listen` call.
#[derive(Debug, Clone)]
pub struct EventStreamClient {
    inner: tonic::client::Grpc<Channel>,
}

impl EventStreamClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    pub async fn listen(
        &mut self,
        request: Request<Auth>,
    ) -> Result<Response<Streaming<Event>>, Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unavailable(format!("Service was not ready: {e}")))?;

        let codec = ProstCodec::<Auth, Event>::default();
        let path = PathAndQuery::from_static(LISTEN_PATH);
        self.inner.server_streaming(request, path, codec).await
    }
}
