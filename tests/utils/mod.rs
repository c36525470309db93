#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use event_stream_relay::config::{Config, StreamConfig};
use event_stream_relay::domain::{AuthCredential, Event, EventSource, EventStream};
use event_stream_relay::error::RelayError;
use event_stream_relay::inbound::stream::{SignatureScheme, StreamAuthenticator};
use event_stream_relay::server::Server;
use futures::stream;

pub async fn spawn_server() -> String {
    let config = {
        let mut config = Config::load().unwrap();
        config.server.host = "localhost".to_string();
        config.server.port = 0;
        config
    };

    let server = Server::new(&config).await.unwrap();

    let port = server.port().unwrap();
    tokio::spawn(server.run());

    format!("http://{}:{}", config.server.host, port)
}

pub fn authenticator() -> StreamAuthenticator {
    StreamAuthenticator::new(&StreamConfig {
        endpoint: "https://events.example.com".to_string(),
        access_key: "test-access-key".to_string(),
        secret_key: "test-secret-key".to_string(),
        signing_material: String::new(),
        signature_scheme: SignatureScheme::Chained,
        credential_ttl_secs: 1000,
        keepalive_interval_secs: 1,
    })
}

pub type Session = Result<Vec<Event>, RelayError>;

/// Replays one scripted session per `open`; once the script runs out, every
/// further stream stays open without yielding.
#[derive(Default)]
pub struct ScriptedSource {
    sessions: Mutex<VecDeque<Session>>,
    credentials: Mutex<Vec<AuthCredential>>,
}

impl ScriptedSource {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self {
            sessions: Mutex::new(sessions.into()),
            credentials: Mutex::new(Vec::new()),
        }
    }

    /// A source whose every connection attempt is refused.
    pub fn refusing(times: usize) -> Self {
        Self::new(
            (0..times)
                .map(|_| Err(RelayError::TransportFailure("connection refused".to_string())))
                .collect(),
        )
    }

    pub fn opens(&self) -> usize {
        self.credentials.lock().unwrap().len()
    }

    pub fn credentials(&self) -> Vec<AuthCredential> {
        self.credentials.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn open(&self, credential: &AuthCredential) -> Result<EventStream, RelayError> {
        self.credentials.lock().unwrap().push(credential.clone());
        let next = self.sessions.lock().unwrap().pop_front();
        match next {
            Some(Ok(events)) => Ok(Box::pin(stream::iter(events.into_iter().map(Ok)))),
            Some(Err(e)) => Err(e),
            None => Ok(Box::pin(stream::pending::<Result<Event, RelayError>>())),
        }
    }
}
