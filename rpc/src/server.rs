//! Axum-based RPC server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use agora_governance::ProposalEngine;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::RpcError;
use crate::handlers;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ProposalEngine>,
}

/// Build the router with every proposal endpoint.
///
/// CORS is permissive so a browser front end served from another origin can
/// call the API directly.
pub fn router(engine: Arc<ProposalEngine>) -> Router {
    Router::new()
        .route(
            "/proposals",
            get(handlers::list_proposals).post(handlers::create_proposal),
        )
        .route(
            "/proposals/:id",
            get(handlers::get_proposal).put(handlers::edit_proposal),
        )
        .route("/proposals/:id/tally", get(handlers::get_tally))
        .route("/proposals/:id/vote", post(handlers::vote))
        .route("/proposals/:id/end", post(handlers::end_proposal))
        .layer(CorsLayer::permissive())
        .with_state(AppState { engine })
}

pub struct RpcServer {
    pub addr: SocketAddr,
    engine: Arc<ProposalEngine>,
}

impl RpcServer {
    pub fn new(addr: SocketAddr, engine: Arc<ProposalEngine>) -> Self {
        Self { addr, engine }
    }

    /// Serve until `shutdown` resolves, then finish in-flight requests.
    pub async fn start<F>(&self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(Arc::clone(&self.engine));
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {}: {e}", self.addr)))?;
        info!("RPC server listening on {}", self.addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        info!("RPC server stopped");
        Ok(())
    }
}
