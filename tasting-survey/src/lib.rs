//! # tasting-survey
//!
//! Web front of the chocolate tasting survey. Serves the survey form built
//! from a TOML catalog, keeps one server-side session per browser and mails
//! each completed survey as a JSON attachment.
//!
//! ## Routes
//!
//! - `GET /` - the form, or the thank-you page once the session submitted
//! - `POST /` - submit; redirects back to `/` on success
//! - `GET /assets/*` - item images
//! - `GET /health` - liveness check
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = tasting_survey::config::Config::load()?;
//! tasting_survey::start_server(config).await?;
//! ```

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, info, warn};

pub mod config;
pub mod controller;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;

/// How often idle sessions are swept out of the store.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

use config::Config;
use error::AppError;
use routes::{form_handler, health_handler, submit_handler};
use state::State;

pub fn router(state: Arc<State>) -> Router {
    Router::new()
        .route("/", get(form_handler).post(submit_handler))
        .route("/health", get(health_handler))
        .nest_service("/assets", ServeDir::new(&state.assets_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: Config) -> Result<(), AppError> {
    info!("Initializing state...");
    let port = config.port;
    let state = State::from_config(config)?;

    tokio::spawn(sweep_sessions(Arc::clone(&state)));

    info!("Starting server...");
    let app = router(state);

    let address = format!("0.0.0.0:{port}");
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn sweep_sessions(state: Arc<State>) {
    let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        ticker.tick().await;
        let evicted = state.sessions.evict_idle();
        if evicted > 0 {
            debug!(evicted, remaining = state.sessions.len(), "Evicted idle sessions");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
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
