mod handlers;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::server::handlers::liveness::liveness;
use axum::{Router, routing::any};
use color_eyre::eyre::{Context, Result};
use tower_http::trace::TraceLayer;

/// Liveness probe server.
///
/// Answers every request with `200 OK` regardless of relay state; it shares
/// nothing with the relay loop besides the process.
pub struct Server {
    router: Router,
    listener: TcpListener,
}

impl Server {
    /// Binds the liveness listener.
    pub async fn new(config: &Config) -> Result<Self> {
        let trace_layer =
            TraceLayer::new_for_http().make_span_with(|request: &'_ axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                tracing::debug_span!("request", method = %request.method(), uri)
            });

        let router = Router::new()
            .route("/", any(liveness))
            .fallback(liveness)
            .layer(trace_layer);

        let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))
            .await
            .wrap_err_with(|| format!("Failed to bind to port {}", config.server.port))?;

        Ok(Self { router, listener })
    }

    pub fn port(&self) -> Result<u16> {
        let addr = self
            .listener
            .local_addr()
            .wrap_err("Liveness listener has no local address")?;
        Ok(addr.port())
    }

    /// Serves until the process exits.
    pub async fn run(self) -> Result<()> {
        tracing::info!("Liveness probe listening on {}", self.listener.local_addr()?);
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }
}
