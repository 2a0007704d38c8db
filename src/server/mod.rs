//! HTTP upload service
//!
//! Routes:
//! - `POST /convert`: multipart `file` field, converted with the service configuration
//! - `POST /convert/batch`: every `files` field converted independently
//! - `GET /health`: liveness, after a self-test conversion
//! - `GET /api/info`: service description and parser configuration

mod handlers;
mod upload;

pub use upload::{convert_upload, format_file_size, ApiError, Upload};

use crate::converters::{AidxConverter, ConverterConfig, DEFAULT_SKIP_TAGS};
use crate::error::Result;
use crate::limits::Limits;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tracing::info;

/// Default maximum upload size: 16 MiB
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Service configuration, from flags or environment
#[derive(Debug, Clone, clap::Args)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "AIDX_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "AIDX_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Largest accepted request body in bytes
    #[arg(long, env = "AIDX_MAX_UPLOAD_SIZE", default_value_t = DEFAULT_MAX_UPLOAD_SIZE)]
    pub max_upload_size: usize,

    /// Element local names dropped from every conversion
    #[arg(
        long = "skip-tag",
        env = "AIDX_SKIP_TAGS",
        value_delimiter = ',',
        default_values_t = DEFAULT_SKIP_TAGS.iter().map(|t| t.to_string()).collect::<Vec<_>>()
    )]
    pub skip_tags: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            skip_tags: DEFAULT_SKIP_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Converter configuration applied to every upload
    pub fn converter_config(&self) -> Result<ConverterConfig> {
        ConverterConfig::builder()
            .with_skip_tags(self.skip_tags.iter().cloned())
            .with_limits(Limits::default().with_max_xml_size(self.max_upload_size))
            .build()
    }
}

/// Shared, read-only state of the service
#[derive(Debug, Clone)]
pub struct AppState {
    /// Converter used for every request
    pub converter: Arc<AidxConverter>,
    /// Largest accepted request body in bytes
    pub max_upload_size: usize,
}

impl AppState {
    /// Build the state from the service configuration
    pub fn new(config: &ServerConfig) -> Result<Self> {
        Ok(Self {
            converter: Arc::new(AidxConverter::with_config(config.converter_config()?)),
            max_upload_size: config.max_upload_size,
        })
    }
}

/// Build the router; oversized bodies are rejected before reaching handlers
pub fn router(state: AppState) -> Router {
    let limit = state.max_upload_size;
    Router::new()
        .route("/convert", post(handlers::convert))
        .route("/convert/batch", post(handlers::convert_batch))
        .route("/health", get(handlers::health))
        .route("/api/info", get(handlers::api_info))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

/// Run the service until interrupted
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::new(&config)?;
    let addr = config.addr();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "AIDX converter listening on {} (max upload {})",
        addr,
        format_file_size(config.max_upload_size)
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("AIDX converter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}
