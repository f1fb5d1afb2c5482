mod api;
mod database_connection;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::{header::CONTENT_TYPE, Method};
use lazy_static::lazy_static;
use serde::Deserialize;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::database_connection::DatabaseConnection;

lazy_static! {
    static ref CONFIG: MainConfig = envy::from_env::<MainConfig>().unwrap();
}

#[derive(Deserialize, Debug)]
struct MainConfig {
    #[serde(rename = "vote_server_db_path", default = "default_db_path")]
    db_path: String,
    #[serde(rename = "vote_server_bind", default = "default_bind")]
    bind: SocketAddr,
    #[serde(rename = "vote_server_static_dir", default = "default_static_dir")]
    static_dir: String,
}

fn default_db_path() -> String {
    "sqlite://data/database.db".to_string()
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8001))
}

fn default_static_dir() -> String {
    "static".to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loaded config: {:?}", *CONFIG);

    let db = Arc::new(DatabaseConnection::new(&CONFIG.db_path).await?);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let app = api::routes(db)
        .nest_service("/static", ServeDir::new(&CONFIG.static_dir))
        .layer(cors);

    info!("Serving votes on {}", CONFIG.bind);

    axum::Server::bind(&CONFIG.bind)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C, shutting down");
    }
}
