//! # Fan Hub API Server
//!
//! The main entry point for the Actix-web HTTP server. The Socket.IO server
//! for the live notification bell runs on its own port next to it.

use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

mod background;
mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

#[cfg(feature = "websocket")]
mod websocket;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

use fanhub_core::ports::{PasswordService, TokenService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Fan Hub API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;

    let token_service = build_token_service();
    let password_service = build_password_service();

    #[cfg(feature = "scheduler")]
    let scheduler = start_scheduler(state.clone()).await;

    #[cfg(feature = "websocket")]
    start_socket_server(&config, state.clone(), token_service.clone()).await?;

    // Start HTTP server
    let result = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(password_service.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    #[cfg(feature = "scheduler")]
    if let Some(mut scheduler) = scheduler {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler shutdown failed");
        }
    }

    result
}

#[cfg(feature = "auth")]
fn build_token_service() -> Arc<dyn TokenService> {
    Arc::new(fanhub_infra::JwtTokenService::from_env())
}

#[cfg(not(feature = "auth"))]
fn build_token_service() -> Arc<dyn TokenService> {
    panic!("api-server requires the `auth` feature for token handling");
}

#[cfg(feature = "auth")]
fn build_password_service() -> Arc<dyn PasswordService> {
    Arc::new(fanhub_infra::Argon2PasswordService::new())
}

#[cfg(not(feature = "auth"))]
fn build_password_service() -> Arc<dyn PasswordService> {
    panic!("api-server requires the `auth` feature for password handling");
}

#[cfg(feature = "scheduler")]
async fn start_scheduler(state: AppState) -> Option<background::Scheduler> {
    let scheduler = match background::Scheduler::new(background::SchedulerConfig::from_env()).await
    {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create scheduler");
            return None;
        }
    };

    if let Err(e) = background::spawn_orphan_sweep(&scheduler, state).await {
        tracing::error!(error = %e, "Failed to register orphan sweep");
    }

    if let Err(e) = scheduler.start().await {
        tracing::error!(error = %e, "Failed to start scheduler");
        return None;
    }

    Some(scheduler)
}

#[cfg(feature = "websocket")]
async fn start_socket_server(
    config: &AppConfig,
    state: AppState,
    token_service: Arc<dyn TokenService>,
) -> std::io::Result<()> {
    let (layer, _io) = websocket::create_socketio_layer(state, token_service);

    let socket_port = std::env::var("SOCKET_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config.port + 1);

    let app = axum::Router::new().layer(layer);
    let listener =
        tokio::net::TcpListener::bind((config.host.as_str().to_string(), socket_port)).await?;

    tracing::info!("Socket.IO server listening on port {}", socket_port);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Socket.IO server failed");
        }
    });

    Ok(())
}
