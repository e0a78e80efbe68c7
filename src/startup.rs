use crate::api::dto::{HealthResponse, HealthStatus, StructureRequest, StructureResponse};
use crate::configuration::{CorsSettings, KeepAliveSettings, Settings};
use crate::github::{GitHubClient, GitHubError};
use crate::schedule::spawn_keep_alive;
use crate::structure::{StructureError, resolve_structure};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::HeaderValue,
    routing::{get, post},
};
use reqwest::{
    Method,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub const API_PREFIX: &str = "/api";

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    github: Arc<Result<GitHubClient, GitHubError>>,
}

impl AppState {
    pub fn new(github: Result<GitHubClient, GitHubError>) -> Self {
        Self {
            github: Arc::new(github),
        }
    }

    fn github(&self) -> Result<&GitHubClient, StructureError> {
        match self.github.as_ref() {
            Ok(client) => Ok(client),
            Err(GitHubError::MissingToken) => Err(StructureError::Unauthenticated),
            Err(e) => Err(StructureError::Internal(e.to_string())),
        }
    }
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    keep_alive: KeepAliveSettings,
}

impl Application {
    /// Binds the listener and wires the router. A GitHub client that cannot
    /// be built does not stop start-up; it is reported by `/api/health`.
    pub async fn build(configuration: Settings) -> Result<Self, io::Error> {
        let github = GitHubClient::from_settings(&configuration.github);
        if let Err(e) = &github {
            warn!("GitHub client is not available: {}", e);
        }

        let listener = TcpListener::bind(configuration.application.address()).await?;
        let port = listener.local_addr()?.port();
        let router = Self::app(AppState::new(github), &configuration.cors)?;

        Ok(Self {
            port,
            listener,
            router,
            keep_alive: configuration.keep_alive,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn app(state: AppState, cors: &CorsSettings) -> Result<Router, io::Error> {
        let allowed_origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("Invalid CORS origin '{origin}': {e}"),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cors = CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCEPT])
            .allow_credentials(true);

        let api = Router::new()
            .route("/health", get(health_check))
            .route("/structure", post(structure_handler));

        Ok(Router::new()
            .route("/", get(|| async { "GitNest API" }))
            .nest(API_PREFIX, api)
            .with_state(state)
            .layer(cors)
            .layer(TraceLayer::new_for_http()))
    }

    /// Serves until Ctrl-C or SIGTERM, then stops the keep-alive task.
    pub async fn run_until_stopped(self) -> Result<(), io::Error> {
        let token = CancellationToken::new();
        let keep_alive = spawn_keep_alive(&self.keep_alive, token.clone());

        info!("Listening on port {}", self.port);
        let result = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        token.cancel();
        if let Some(handle) = keep_alive
            && let Err(e) = handle.await
        {
            error!("Keep-alive task failed: {}", e);
        }
        result
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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
    info!("Shutdown signal received");
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let response = match state.github.as_ref() {
        Ok(_) => HealthResponse {
            status: HealthStatus::Ok,
            message: "API is running and GitHub client is initialized".to_string(),
        },
        Err(e) => HealthResponse {
            status: HealthStatus::Error,
            message: e.to_string(),
        },
    };
    Json(response)
}

async fn structure_handler(
    State(state): State<AppState>,
    payload: Result<Json<StructureRequest>, JsonRejection>,
) -> Result<Json<StructureResponse>, StructureError> {
    let Json(payload) = payload?;
    info!("Received structure request for {}", payload.url);
    let client = state.github()?;
    let resolved = resolve_structure(client, &payload.url).await?;
    Ok(Json(resolved.into()))
}
