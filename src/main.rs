use std::sync::Arc;

use color_eyre::eyre::Context;
use event_stream_relay::config::Config;
use event_stream_relay::inbound::stream::{GrpcEventSource, StreamAuthenticator};
use event_stream_relay::outbound::webhook::EventForwarder;
use event_stream_relay::relay::{ReconnectSupervisor, RetryStrategy};
use event_stream_relay::server::Server;
use event_stream_relay::telemetry;
use tokio_util::sync::CancellationToken;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static ALLOC: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    telemetry::init_tracing();

    // Load configuration
    let config = Config::load()?;
    config.validate()?;
    tracing::info!("Loaded configuration: {:?}", config);

    // Liveness probe runs for the whole process lifetime
    let server = Server::new(&config).await?;
    tokio::spawn(async move {
        if let Err(e) = server.run().await {
            tracing::error!(error = %e, "Liveness server stopped");
        }
    });

    let source = GrpcEventSource::new(&config.stream).wrap_err("Invalid stream configuration")?;
    let forwarder = EventForwarder::new(&config.webhook).wrap_err("Invalid webhook configuration")?;
    tracing::info!(
        stream = %source.uri(),
        webhook = %forwarder.webhook_url(),
        "Relay configured"
    );

    let authenticator = StreamAuthenticator::new(&config.stream);
    tracing::info!(
        scheme = ?config.stream.signature_scheme,
        credential_horizon = %authenticator.horizon(),
        "Stream credentials configured"
    );

    let supervisor = ReconnectSupervisor::new(
        authenticator,
        Arc::new(source),
        Arc::new(forwarder),
    )
    .with_retry_strategy(RetryStrategy::from_config(&config.reconnect))
    .with_reset_on_success(config.reconnect.reset_on_success);

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    let termination = supervisor.run(shutdown).await;
    tracing::info!(termination = ?termination, "Relay exited");
    Ok(())
}

/// Cancel `shutdown` on Ctrl-C or SIGTERM.
async fn cancel_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
