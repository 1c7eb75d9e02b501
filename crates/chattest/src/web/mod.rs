//! Browser front end: the chat page and the JSON endpoints behind it.
mod handlers;
mod page;
mod types;

pub use handlers::create_router;
pub use types::{ChatRequest, StatusResponse};

use anyhow::{Context, Result};
use chattest_core::{credential::KeyNotice, session::Session};
use minijinja::Environment;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for all requests.
///
/// Holds no conversation: each page keeps its own transcript and sends it
/// along with every message.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Session>,
    key_notice: Arc<KeyNotice>,
    templates: Arc<Environment<'static>>,
}

impl AppState {
    pub fn new(session: Session, key_notice: KeyNotice) -> Result<Self> {
        Ok(Self {
            session: Arc::new(session),
            key_notice: Arc::new(key_notice),
            templates: Arc::new(page::environment()?),
        })
    }

    pub fn model_name(&self) -> &str {
        self.session.model_name()
    }
}

/// Serve the chat page on `addr` until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {addr}"))?;
    info!(%addr, "Chat tester listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Chat tester stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
