// Vendor event stream
//
//   signature     – HMAC-SHA256 signing chain
//   authenticator – per-attempt credential (expiration + access key + signature)
//   proto         – wire messages and the `Listen` client
//   consumer      – `EventSource` backed by a TLS gRPC channel

pub mod authenticator;
pub mod consumer;
pub mod proto;
pub mod signature;

pub use authenticator::StreamAuthenticator;
pub use consumer::GrpcEventSource;
pub use signature::{SignatureScheme, sign, sign_prehashed};
