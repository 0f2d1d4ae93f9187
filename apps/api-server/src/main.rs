//! # MiniLinkedIn API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use minilinkedin_infra::DatabaseConnections;
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::error::internal_error_detail;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{LogFormat, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(LogFormat::from_env());

    let config = AppConfig::from_env();
    config.warn_on_insecure_defaults();

    tracing::info!(
        "Starting MiniLinkedIn API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;
    let db = state.db.clone();
    let development = config.development;

    HttpServer::new(move || {
        App::new()
            .wrap(internal_error_detail(development))
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    close_database(db).await;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(feature = "postgres")]
async fn close_database(db: Option<Arc<DatabaseConnections>>) {
    let Some(db) = db else { return };

    match Arc::try_unwrap(db) {
        Ok(connections) => {
            if let Err(e) = connections.close().await {
                tracing::warn!("Failed to close database pool: {}", e);
            }
        }
        Err(_) => tracing::debug!("Database pool still shared at shutdown; dropping it"),
    }
}

#[cfg(not(feature = "postgres"))]
async fn close_database(_db: Option<Arc<DatabaseConnections>>) {}
