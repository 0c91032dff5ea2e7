//! Admin HTTP server host utilities.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use navsphere_engine::ContentStore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::routes::router;
use crate::state::AppState;

/// Host configuration for an admin HTTP server instance.
#[derive(Debug, Clone)]
pub struct AdminServer {
    bind_address: SocketAddr,
    state: AppState,
}

impl AdminServer {
    /// Create a new server bound to the provided address and serving content
    /// from `store`.
    pub fn new(bind_address: SocketAddr, store: Arc<dyn ContentStore>) -> Self {
        Self {
            bind_address,
            state: AppState::new(store),
        }
    }

    /// Start the server and return a handle for inspection and shutdown.
    pub async fn start(self) -> Result<RunningAdminServer> {
        let cancellation_token = CancellationToken::new();
        let listener = tokio::net::TcpListener::bind(self.bind_address).await?;
        let bound_address = listener.local_addr()?;
        let app = router(self.state);

        let server_handle = tokio::spawn({
            let shutdown = cancellation_token.child_token();
            async move {
                let _ = axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        shutdown.cancelled().await;
                    })
                    .await;
            }
        });

        info!(address = %bound_address, "admin server listening");
        Ok(RunningAdminServer {
            bind_address: bound_address,
            cancellation_token,
            server_handle,
        })
    }
}

/// Runtime handle for a running admin server.
#[derive(Debug)]
pub struct RunningAdminServer {
    bind_address: SocketAddr,
    cancellation_token: CancellationToken,
    server_handle: JoinHandle<()>,
}

impl RunningAdminServer {
    /// Return the bound socket address for the running server.
    pub fn bound_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Stop the server and wait for in-flight requests to finish.
    pub async fn stop(self) -> Result<()> {
        self.cancellation_token.cancel();
        self.server_handle
            .await
            .map_err(|error| anyhow!("admin server task failed: {error}"))?;
        info!(address = %self.bind_address, "admin server stopped");
        Ok(())
    }
}

/// Parse the configured bind address. Non-loopback addresses are allowed
/// but logged, since the API accepts commits from any bearer token.
pub fn resolve_bind_address(bind_address: &str) -> Result<SocketAddr> {
    let parsed: SocketAddr = bind_address
        .trim()
        .parse()
        .map_err(|error| anyhow!("invalid bind address '{bind_address}': {error}"))?;
    if !is_loopback(parsed.ip()) {
        warn!(address = %parsed, "admin server is reachable from other hosts");
    }
    Ok(parsed)
}

fn is_loopback(address: IpAddr) -> bool {
    match address {
        IpAddr::V4(ip) => ip.is_loopback(),
        IpAddr::V6(ip) => ip.is_loopback(),
    }
}
