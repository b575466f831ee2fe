//! HTTP surface: generated site, rebuild trigger and booking form.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use quire_static::{BuildError, SiteBuilder};

use crate::scheduler::{Scheduler, DEFAULT_INTERVAL};

/// Path prefix of the rebuild trigger; the password follows it.
pub const REBUILD_PREFIX: &str = "/rebuild-pages-pw:";

/// Path receiving booking forms.
pub const BOOKING_PATH: &str = "/submit-booking";

/// Pause before restarting a server that stopped with an error.
const RESTART_PAUSE: Duration = Duration::from_secs(1);

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Secret part of the rebuild trigger path
    pub password: String,

    /// Pause between two change scans
    pub interval: Duration,

    /// Open browser on start
    pub open: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            password: String::new(),
            interval: DEFAULT_INTERVAL,
            open: false,
        }
    }
}

impl ServerConfig {
    /// Resolve the configured host and port.
    pub fn addr(&self) -> Result<SocketAddr, ServerError> {
        let display = format!("{}:{}", self.host, self.port);

        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| ServerError::AddrError(display.clone(), e.to_string()))?
            .next()
            .ok_or_else(|| ServerError::AddrError(display, "no address found".to_string()))
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}: {1}")]
    AddrError(String, String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Server error on {0}: {1}")]
    ServeError(SocketAddr, String),

    #[error("Failed to scan notes: {0}")]
    ScanError(String),

    #[error("Background task failed: {0}")]
    TaskError(String),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    builder: Arc<SiteBuilder>,
    rebuild_path: String,
    output_dir: PathBuf,
}

impl AppState {
    pub fn new(builder: Arc<SiteBuilder>, password: &str) -> Self {
        Self {
            output_dir: builder.output_dir().to_path_buf(),
            rebuild_path: format!("{REBUILD_PREFIX}{password}"),
            builder,
        }
    }
}

/// Build the router serving the output directory.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(BOOKING_PATH, post(submit_booking).fallback(fallback))
        .fallback(fallback)
        .with_state(state)
}

/// Serves the generated site while a [`Scheduler`] keeps it current.
pub struct QuireServer {
    config: ServerConfig,
    builder: Arc<SiteBuilder>,
}

impl QuireServer {
    /// Create a new server.
    pub fn new(config: ServerConfig, builder: Arc<SiteBuilder>) -> Self {
        Self { config, builder }
    }

    /// Build once, then run change detection and the HTTP server until
    /// Ctrl-C or SIGTERM.
    ///
    /// Fails right away if the address cannot be bound.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = self.config.addr()?;
        let listener = bind(addr).await?;

        let builder = Arc::clone(&self.builder);
        let initial = tokio::task::spawn_blocking(move || builder.rebuild_from_config())
            .await
            .map_err(|e| ServerError::TaskError(e.to_string()))??;

        tracing::info!(
            "Built {} pages in {}ms",
            initial.pages.len(),
            initial.duration_ms
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let scheduler = Scheduler::new(
            Arc::clone(&self.builder),
            initial.fingerprints,
            self.config.interval,
        );
        let poll = tokio::spawn(scheduler.run(shutdown_rx.clone()));

        let state = AppState::new(Arc::clone(&self.builder), &self.config.password);
        let serve = tokio::spawn(run_server(state, listener, shutdown_rx));

        tracing::info!("Serving {} at http://{}", initial.output_dir.display(), addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        shutdown_signal().await;
        tracing::info!("Shutdown signal received, stopping...");
        let _ = shutdown_tx.send(true);

        let (poll, serve) = tokio::join!(poll, serve);
        poll.map_err(|e| ServerError::TaskError(e.to_string()))?;
        serve.map_err(|e| ServerError::TaskError(e.to_string()))?;

        Ok(())
    }
}

/// Keep the HTTP server up until shutdown, restarting it after failures.
///
/// Serves on `listener` first; restarts bind its address again.
pub async fn run_server(
    state: AppState,
    listener: TcpListener,
    mut shutdown: watch::Receiver<bool>,
) {
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("Listener has no local address: {}", e);
            return;
        }
    };
    let mut listener = Some(listener);

    while !*shutdown.borrow() {
        let result = match listener.take() {
            Some(listener) => serve(state.clone(), listener, addr, shutdown.clone()).await,
            None => match bind(addr).await {
                Ok(listener) => serve(state.clone(), listener, addr, shutdown.clone()).await,
                Err(e) => Err(e),
            },
        };

        if *shutdown.borrow() {
            break;
        }

        match result {
            Ok(()) => tracing::warn!("Server on {} stopped, restarting", addr),
            Err(e) => tracing::error!("{}, restarting", e),
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::time::sleep(RESTART_PAUSE) => {}
        }
    }

    tracing::info!("Server stopped");
}

/// Bind a listener on `addr`.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::BindError(addr, e.to_string()))
}

/// Serve on `listener` until `shutdown` turns true.
pub async fn serve(
    state: AppState,
    listener: TcpListener,
    addr: SocketAddr,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), ServerError> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
        })
        .await
        .map_err(|e| ServerError::ServeError(addr, e.to_string()))
}

/// Wait for Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
}

/// Rebuild trigger, static files, or 404.
async fn fallback(State(state): State<AppState>, req: Request<Body>) -> Response {
    let method = req.method().clone();

    if method == Method::GET && req.uri().path() == state.rebuild_path {
        return rebuild(state.builder).await;
    }

    if method != Method::GET && method != Method::HEAD {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }

    match ServeDir::new(&state.output_dir).oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Run a full rebuild on the blocking pool.
async fn rebuild(builder: Arc<SiteBuilder>) -> Response {
    tracing::info!("Rebuild requested");

    match tokio::task::spawn_blocking(move || builder.rebuild_from_config()).await {
        Ok(Ok(result)) => {
            tracing::info!(
                "Rebuilt {} pages in {}ms",
                result.pages.len(),
                result.duration_ms
            );
            (StatusCode::OK, "Pages rebuilt").into_response()
        }
        Ok(Err(e)) => {
            tracing::error!("Rebuild failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Rebuild failed: {e}")).into_response()
        }
        Err(e) => {
            tracing::error!("Rebuild task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Rebuild failed").into_response()
        }
    }
}

/// A booking request from the site's booking form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Booking {
    pub name: String,
    pub email: String,
    pub dates: String,
    pub guests: String,
}

/// Accept a multipart booking form and acknowledge it.
async fn submit_booking(payload: Result<Multipart, MultipartRejection>) -> Response {
    let Ok(mut multipart) = payload else {
        return (StatusCode::BAD_REQUEST, "Invalid form data").into_response();
    };

    let mut name = None;
    let mut email = None;
    let mut dates = None;
    let mut guests = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Malformed booking form: {}", e);
                return (StatusCode::BAD_REQUEST, "Invalid form data").into_response();
            }
        };

        let slot = match field.name() {
            Some("name") => &mut name,
            Some("email") => &mut email,
            Some("dates") => &mut dates,
            Some("guests") => &mut guests,
            _ => continue,
        };

        match field.text().await {
            Ok(text) => *slot = Some(text),
            Err(e) => {
                tracing::warn!("Malformed booking form: {}", e);
                return (StatusCode::BAD_REQUEST, "Invalid form data").into_response();
            }
        }
    }

    let booking = match (name, email, dates, guests) {
        (Some(name), Some(email), Some(dates), Some(guests)) => Booking {
            name,
            email,
            dates,
            guests,
        },
        _ => return (StatusCode::BAD_REQUEST, "Missing form fields").into_response(),
    };

    tracing::info!(
        "Received booking request from {} ({}) for dates {} with {} guests",
        booking.name,
        booking.email,
        booking.dates,
        booking.guests
    );

    Json(serde_json::json!({
        "status": "success",
        "message": "Booking request received",
    }))
    .into_response()
}
