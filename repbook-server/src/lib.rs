//! HTTP front-end for the workout store.

mod http;
mod middleware;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use log::info;
use repbook::Tracker;

pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000);

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Tracker>,
}

impl AppState {
    #[must_use]
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker: Arc::new(tracker),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::root_handler))
        .route(
            "/exercises",
            get(http::exercises::list_handler).post(http::exercises::create_handler),
        )
        .route(
            "/exercises/:id",
            get(http::exercises::get_handler)
                .patch(http::exercises::update_handler)
                .delete(http::exercises::delete_handler),
        )
        .route(
            "/workouts",
            get(http::workouts::list_handler).post(http::workouts::create_handler),
        )
        .route("/workouts/history", get(http::workouts::history_handler))
        .route(
            "/workouts/:id",
            get(http::workouts::get_handler)
                .patch(http::workouts::update_handler)
                .delete(http::workouts::delete_handler),
        )
        .route(
            "/workouts/:id/create-template",
            post(http::templates::from_workout_handler),
        )
        .route("/sets", post(http::sets::create_handler))
        .route(
            "/sets/:id",
            patch(http::sets::update_handler).delete(http::sets::delete_handler),
        )
        .route(
            "/templates",
            get(http::templates::list_handler).post(http::templates::create_handler),
        )
        .route(
            "/templates/:id",
            get(http::templates::get_handler)
                .patch(http::templates::update_handler)
                .delete(http::templates::delete_handler),
        )
        .route("/templates/:id/sets", post(http::templates::add_set_handler))
        .route(
            "/templates/:id/create-workout",
            post(http::templates::to_workout_handler),
        )
        .route(
            "/template-sets/:id",
            delete(http::templates::delete_set_handler),
        )
        .route("/records", get(http::records::list_handler))
        .route("/records/:exercise_id", get(http::records::exercise_handler))
        .layer(axum::middleware::from_fn(middleware::request_logging))
        .with_state(state)
}

/// Serves until ctrl-c.
pub async fn serve(state: AppState, config: ServerConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_binds_localhost_8000() {
        assert_eq!(ServerConfig::default().bind, DEFAULT_BIND);
        assert_eq!(DEFAULT_BIND.to_string(), "127.0.0.1:8000");
    }
}
