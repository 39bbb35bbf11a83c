// ./src/app.rs
//! Service wiring and lifecycle.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::approval::ApprovalService;
use crate::config::Config;
use crate::{http, signer, store};

pub struct Application {
    config: Config,
    service: Arc<ApprovalService>,
}

impl Application {
    /// Opens the store, loads the approval key and builds the engine.
    pub fn build(config: Config) -> Result<Self> {
        let settings = config.approval_settings()?;
        let store = store::open(&config.store, &settings.network).context("failed to open ledger store")?;
        let signer = signer::from_config(&config.secret).context("failed to load approval key")?;
        info!(
            chain_id = settings.network.chain_id(),
            scheme = ?settings.scheme,
            leaf_version = ?settings.encoder.version,
            entry_layout = ?settings.encoder.layout,
            payload_format = ?settings.payload_format,
            whitelist = settings.whitelist.len(),
            "approval engine ready"
        );
        let service = Arc::new(ApprovalService::new(settings, store, signer));
        Ok(Self { config, service })
    }

    pub fn router(&self) -> Router { http::router(self.service.clone()) }

    /// Serves HTTP until Ctrl-C or SIGTERM, then drains for at most `shutdown_timeout`.
    pub async fn run(self, shutdown_timeout: Duration) -> Result<()> {
        let addr = self.config.http.bind_address();
        let listener =
            TcpListener::bind(&addr).await.with_context(|| format!("failed to bind {addr}"))?;
        info!(%addr, "listening");

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let server = axum::serve(listener, self.router()).with_graceful_shutdown(async move {
            stop_rx.changed().await.ok();
        });
        let mut server = tokio::spawn(async move { server.await });

        tokio::select! {
            joined = &mut server => {
                return joined.context("http server task failed")?.context("http server failed");
            }
            _ = shutdown_signal() => {}
        }

        info!(timeout_secs = shutdown_timeout.as_secs(), "shutting down");
        stop_tx.send(true).ok();
        match tokio::time::timeout(shutdown_timeout, &mut server).await {
            Ok(joined) => joined.context("http server task failed")?.context("http server failed"),
            Err(_) => {
                warn!("graceful shutdown timed out, dropping open connections");
                server.abort();
                Ok(())
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
