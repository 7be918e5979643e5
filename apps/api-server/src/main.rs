//! # ThoughtLane API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::io;

use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::{ThoughtLaneRootSpan, propagate_request_id};
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let telemetry = TelemetryConfig::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    telemetry::init_telemetry(&telemetry).map_err(io::Error::other)?;

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    tracing::info!(
        "Starting ThoughtLane API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::build(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize application state");
        io::Error::other(e)
    })?;

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::<ThoughtLaneRootSpan>::new())
            .wrap(from_fn(propagate_request_id))
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
