use std::convert::Infallible;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use event_stream_relay::config::StreamConfig;
use event_stream_relay::domain::{AuthCredential, EventSource, EventVariant};
use event_stream_relay::inbound::stream::proto::{self, Auth, LISTEN_PATH, event};
use event_stream_relay::inbound::stream::{GrpcEventSource, SignatureScheme};
use futures::{Stream, StreamExt, stream};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::body::BoxBody;
use tonic::codec::ProstCodec;
use tonic::codegen::{BoxFuture, Service, empty_body, http};
use tonic::server::{Grpc, NamedService, ServerStreamingService};
use tonic::transport::Server;
use tonic::{Code, Request, Response, Status};

#[derive(Clone)]
enum Step {
    Send(proto::Event),
    Fail(Code, &'static str),
}

type ListenStream = Pin<Box<dyn Stream<Item = Result<proto::Event, Status>> + Send>>;

/// `EventStream` service that records each `Auth` and replays a fixed script.
#[derive(Clone)]
struct ScriptedListen {
    script: Arc<Vec<Step>>,
    received: Arc<Mutex<Vec<Auth>>>,
}

impl ScriptedListen {
    fn new(script: Vec<Step>) -> Self {
        Self {
            script: Arc::new(script),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn received(&self) -> Vec<Auth> {
        self.received.lock().unwrap().clone()
    }
}

struct ListenCall(ScriptedListen);

impl ServerStreamingService<Auth> for ListenCall {
    type Response = proto::Event;
    type ResponseStream = ListenStream;
    type Future = BoxFuture<Response<ListenStream>, Status>;

    fn call(&mut self, request: Request<Auth>) -> Self::Future {
        self.0.received.lock().unwrap().push(request.into_inner());

        let items: Vec<Result<proto::Event, Status>> = self
            .0
            .script
            .iter()
            .map(|step| match step {
                Step::Send(event) => Ok(event.clone()),
                Step::Fail(code, message) => Err(Status::new(*code, *message)),
            })
            .collect();

        Box::pin(async move {
            let events: ListenStream = Box::pin(stream::iter(items));
            Ok(Response::new(events))
        })
    }
}

impl Service<http::Request<BoxBody>> for ScriptedListen {
    type Response = http::Response<BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<BoxBody>) -> Self::Future {
        let listen = ListenCall(self.clone());

        Box::pin(async move {
            if request.uri().path() != LISTEN_PATH {
                let response = http::Response::builder()
                    .header("grpc-status", (Code::Unimplemented as i32).to_string())
                    .header("content-type", "application/grpc")
                    .body(empty_body())
                    .unwrap();
                return Ok(response);
            }

            let mut grpc = Grpc::new(ProstCodec::<proto::Event, Auth>::default());
            Ok(grpc.server_streaming(listen, request).await)
        })
    }
}

impl NamedService for ScriptedListen {
    const NAME: &'static str = "event_stream.EventStream";
}

/// Serve `service` over plaintext HTTP/2 and return a source pointed at it.
async fn serve(service: ScriptedListen) -> GrpcEventSource {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(
        Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener)),
    );

    GrpcEventSource::new(&StreamConfig {
        endpoint: format!("http://{addr}"),
        access_key: "test-access-key".to_string(),
        secret_key: "test-secret-key".to_string(),
        signing_material: String::new(),
        signature_scheme: SignatureScheme::Chained,
        credential_ttl_secs: 1000,
        keepalive_interval_secs: 1,
    })
    .unwrap()
}

fn wire_event(session: &str, timestamp: i64, data: Option<event::Data>) -> proto::Event {
    proto::Event {
        session: session.to_string(),
        timestamp,
        data,
    }
}

fn credential() -> AuthCredential {
    AuthCredential {
        expiration: "2026-10-19T12:16:40Z".to_string(),
        access_key: "test-access-key".to_string(),
        signature: "ab".repeat(32),
    }
}

#[tokio::test]
async fn test_listen_sends_auth_and_yields_events_until_close() {
    let service = ScriptedListen::new(vec![
        Step::Send(wire_event("s1", 100, Some(event::Data::Start(proto::Start {})))),
        Step::Send(wire_event("s1", 160, Some(event::Data::End(proto::End {})))),
    ]);
    let source = serve(service.clone()).await;

    let mut events = source.open(&credential()).await.unwrap();

    let first = events.next().await.unwrap().unwrap();
    assert_eq!(first.session, "s1");
    assert_eq!(first.timestamp, 100);
    assert_eq!(first.variant, EventVariant::Start);

    let second = events.next().await.unwrap().unwrap();
    assert_eq!(second.timestamp, 160);
    assert_eq!(second.variant, EventVariant::End);

    let end = tokio::time::timeout(Duration::from_secs(5), events.next())
        .await
        .expect("stream should end after the server closes it");
    assert!(end.is_none());

    let received = service.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].expiration, "2026-10-19T12:16:40Z");
    assert_eq!(received[0].access_key, "test-access-key");
    assert_eq!(received[0].signature, "ab".repeat(32));
}

#[tokio::test]
async fn test_event_without_data_is_unknown() {
    let source = serve(ScriptedListen::new(vec![Step::Send(wire_event("s2", 7, None))])).await;

    let mut events = source.open(&credential()).await.unwrap();
    let event = events.next().await.unwrap().unwrap();

    assert_eq!(event.session, "s2");
    assert_eq!(event.variant, EventVariant::Unknown);
    assert!(events.next().await.is_none());
}

#[tokio::test]
async fn test_mid_stream_status_is_an_error_item() {
    let service = ScriptedListen::new(vec![
        Step::Send(wire_event("s3", 1, Some(event::Data::Start(proto::Start {})))),
        Step::Fail(Code::Unavailable, "upstream restarting"),
    ]);
    let source = serve(service).await;

    let mut events = source.open(&credential()).await.unwrap();
    assert!(events.next().await.unwrap().is_ok());

    let err = events.next().await.unwrap().unwrap_err();
    assert_eq!(err.category(), "transport_failure");
}

#[tokio::test]
async fn test_rejected_credential_is_auth_failure() {
    let service = ScriptedListen::new(vec![Step::Fail(Code::Unauthenticated, "bad signature")]);
    let source = serve(service).await;

    // The status may surface on open or as the first item, depending on
    // whether the server flushed headers first.
    let err = match source.open(&credential()).await {
        Ok(mut events) => events.next().await.unwrap().unwrap_err(),
        Err(e) => e,
    };
    assert_eq!(err.category(), "auth_rejected");
}
