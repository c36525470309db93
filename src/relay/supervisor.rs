use std::sync::Arc;

use futures::StreamExt;
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::retry_strategy::{RetryState, RetryStrategy};
use super::state::{RelayState, Termination};
use crate::domain::{EventSink, EventSource};
use crate::error::RelayError;
use crate::inbound::stream::StreamAuthenticator;

/// Drives the connect → stream → backoff → reconnect loop.
///
/// Each cycle builds a fresh credential, opens the stream and forwards every
/// event before reading the next one. Any error ends the cycle; the loop then
/// sleeps according to the [`RetryStrategy`] and starts over. The loop only
/// stops when `shutdown` is cancelled or the server closes the stream cleanly.
///
/// When `reset_on_success` is set, the attempt counter goes back to zero as
/// soon as a session forwards an event, so occasional drops on a long-lived
/// process start again from the base delay.
pub struct ReconnectSupervisor {
    authenticator: StreamAuthenticator,
    source: Arc<dyn EventSource>,
    sink: Arc<dyn EventSink>,
    retry_strategy: RetryStrategy,
    reset_on_success: bool,
    state: watch::Sender<RelayState>,
}

impl ReconnectSupervisor {
    pub fn new(
        authenticator: StreamAuthenticator,
        source: Arc<dyn EventSource>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let (state, _) = watch::channel(RelayState::Connecting);

        Self {
            authenticator,
            source,
            sink,
            retry_strategy: RetryStrategy::default(),
            reset_on_success: true,
            state,
        }
    }

    /// Override the retry strategy.
    pub fn with_retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    pub fn with_reset_on_success(mut self, reset_on_success: bool) -> Self {
        self.reset_on_success = reset_on_success;
        self
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<RelayState> {
        self.state.subscribe()
    }

    #[cfg(test)]
    fn state(&self) -> RelayState {
        *self.state.borrow()
    }

    /// Run until interrupted or until the server closes the stream.
    ///
    /// Cancellation is observed at every suspension point: while connecting,
    /// while waiting for or forwarding an event, and while backing off.
    pub async fn run(&self, shutdown: CancellationToken) -> Termination {
        let mut retry = RetryState::default();

        info!(
            base_delay = ?self.retry_strategy.base_delay(),
            max_delay = ?self.retry_strategy.max_delay(),
            schedule = ?self.retry_strategy.schedule(1..=6),
            reset_on_success = self.reset_on_success,
            "Relay supervisor starting"
        );

        loop {
            if shutdown.is_cancelled() {
                return self.terminate(Termination::Interrupted);
            }

            self.transition(RelayState::Connecting);

            let outcome = tokio::select! {
                biased;
                _ = shutdown.cancelled() => Err(RelayError::Interrupted),
                result = self.run_session(&mut retry) => result,
            };

            let failure = match outcome {
                Ok(()) => {
                    info!("Event stream closed by server");
                    return self.terminate(Termination::StreamClosed);
                }
                Err(e) if !e.is_retryable() => {
                    return self.terminate(Termination::Interrupted);
                }
                Err(e) => e,
            };

            let attempt = retry.record_failure();
            let delay = self.retry_strategy.delay_for(attempt);
            self.transition(RelayState::BackingOff);

            error!(
                category = failure.category(),
                attempt = attempt,
                delay = ?delay,
                error = %failure,
                "Relay cycle failed – reconnecting after backoff"
            );

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => return self.terminate(Termination::Interrupted),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// One connection attempt: authenticate, open, then forward until the stream ends.
    async fn run_session(&self, retry: &mut RetryState) -> Result<(), RelayError> {
        let credential = self
            .authenticator
            .build_credential(OffsetDateTime::now_utc())?;
        debug!(expiration = %credential.expiration, "Built stream credential");

        let mut events = self.source.open(&credential).await?;
        self.transition(RelayState::Streaming);

        while let Some(item) = events.next().await {
            let event = item?;
            info!(
                session = %event.session,
                timestamp = event.timestamp,
                subtype = %event.variant,
                "Received event"
            );

            // A failed forward abandons this stream; the event is not replayed.
            self.sink.forward(&event).await?;

            if self.reset_on_success && retry.attempt_count() > 0 {
                debug!(
                    previous_attempts = retry.attempt_count(),
                    "Stream healthy – resetting backoff"
                );
                retry.reset();
            }
        }

        Ok(())
    }

    fn transition(&self, next: RelayState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            debug!(from = %previous, to = %next, "Relay state changed");
        }
    }

    fn terminate(&self, reason: Termination) -> Termination {
        self.transition(RelayState::Terminated);
        info!(reason = ?reason, "Relay supervisor stopped");
        reason
    }
}
