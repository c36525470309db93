// Reconnecting relay loop
//
//   retry_strategy – capped exponential delay and the attempt counter
//   state          – loop phases and termination reasons
//   supervisor     – connect → stream → backoff → reconnect

pub mod retry_strategy;
pub mod state;
pub mod supervisor;

pub use retry_strategy::{RetryState, RetryStrategy};
pub use state::{RelayState, Termination};
pub use supervisor::ReconnectSupervisor;
