use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::auth::{ServerAuthConfig, ServerState};
use crate::routes;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8081);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Token settings from config.toml when present, env fallbacks otherwise.
fn load_auth_config() -> ServerAuthConfig {
    let fallback_secret =
        || env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string());
    match configs::load_default() {
        Ok(mut cfg) => {
            cfg.auth.normalize_from_env();
            let jwt_secret = if cfg.auth.jwt_secret.trim().is_empty() {
                fallback_secret()
            } else {
                cfg.auth.jwt_secret
            };
            ServerAuthConfig {
                jwt_secret,
                access_token_minutes: cfg.auth.access_token_minutes,
                refresh_token_days: cfg.auth.refresh_token_days,
            }
        }
        Err(_) => ServerAuthConfig {
            jwt_secret: fallback_secret(),
            access_token_minutes: 30,
            refresh_token_days: 7,
        },
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // DB connection pool, shared through the router state.
    let db = models::db::connect().await?;

    let state = ServerState { db, auth: load_auth_config() };

    let cors = build_cors();
    let app: Router = routes::build_router(state, cors);

    let addr = load_bind_addr()?;
    info!(%addr, "starting healthcare api server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
