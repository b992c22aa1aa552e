//! API Server Module
//!
//! This module contains the server setup functionality for the API system.

use anyhow::Result;
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use wescu_chat_core::{ReqwestTransport, ServerConfig};

use crate::handlers::{
    create_session, current_time, greeting_audio, health_check, panel_config, widget_script,
    ApiState,
};

/// Build the application router
pub fn router(state: Arc<ApiState>) -> Router {
    // The widget is embedded on other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        // Session operations
        .route("/api/chatkit/session", post(create_session))
        .route("/api/chatkit/config", get(panel_config))
        .route("/api/chatkit/greeting-audio", post(greeting_audio))
        // Page utilities
        .route("/get-current-time", get(current_time).post(current_time))
        .route("/widget.js", get(widget_script))
        // Health check
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Main API server
pub struct ApiServer {
    /// Server configuration
    config: ServerConfig,
    /// Shared state
    state: Arc<ApiState>,
}

impl ApiServer {
    /// Create a server talking to the real upstream
    pub fn new(config: ServerConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.request_timeout())?);
        let state = Arc::new(ApiState::new(config.clone(), transport)?);

        Ok(Self { config, state })
    }

    /// Create a server around prepared state
    pub fn with_state(config: ServerConfig, state: Arc<ApiState>) -> Self {
        Self { config, state }
    }

    /// Start the API server and run until Ctrl+C or SIGTERM
    pub async fn start(&self) -> Result<()> {
        if self.config.api_key().is_none() {
            warn!("OPENAI_API_KEY is not set; session requests will fail with 500");
        }
        if self.config.workflow_id().is_none() {
            warn!("Workflow ID is not set; session requests will fail with 400");
        }

        let address = self.config.bind_address();
        info!("Binding to {}", address);

        let listener = TcpListener::bind(&address).await?;
        info!("WESCU chat API listening on {}", address);

        axum::serve(listener, router(self.state.clone()))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run API server: {}", e))?;

        info!("Server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
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
