use thiserror::Error;

use crate::outbound::webhook::HttpClientError;

/// Failures surfaced to the reconnect supervisor.
///
/// Every variant except [`RelayError::Interrupted`] is retried on the same
/// backoff schedule; the category only changes how the failure is logged.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Stream rejected credential: {0}")]
    AuthRejected(String),

    #[error("Stream transport failure: {0}")]
    TransportFailure(String),

    #[error("Webhook forwarding failed: {0}")]
    ForwardingFailure(String),

    #[error("Unexpected failure: {0}")]
    UnexpectedFailure(String),

    #[error("Relay interrupted")]
    Interrupted,
}

impl RelayError {
    /// Short label used as the `category` field in logs.
    pub fn category(&self) -> &'static str {
        match self {
            RelayError::AuthRejected(_) => "auth_rejected",
            RelayError::TransportFailure(_) => "transport_failure",
            RelayError::ForwardingFailure(_) => "forwarding_failure",
            RelayError::UnexpectedFailure(_) => "unexpected_failure",
            RelayError::Interrupted => "interrupted",
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, RelayError::Interrupted)
    }
}

impl From<tonic::Status> for RelayError {
    fn from(status: tonic::Status) -> Self {
        use tonic::Code;

        let detail = format!("{:?}: {}", status.code(), status.message());
        match status.code() {
            Code::Unauthenticated | Code::PermissionDenied => RelayError::AuthRejected(detail),
            Code::Unavailable
            | Code::DeadlineExceeded
            | Code::Cancelled
            | Code::Aborted
            | Code::ResourceExhausted => RelayError::TransportFailure(detail),
            _ => RelayError::UnexpectedFailure(detail),
        }
    }
}

impl From<tonic::transport::Error> for RelayError {
    fn from(err: tonic::transport::Error) -> Self {
        RelayError::TransportFailure(err.to_string())
    }
}

impl From<HttpClientError> for RelayError {
    fn from(err: HttpClientError) -> Self {
        RelayError::ForwardingFailure(err.to_string())
    }
}
