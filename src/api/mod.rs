use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::net::IpAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::constants::routes;
use crate::services::RequestService;
use crate::state::SharedState;

mod board;
pub mod client_ip;
mod error;
mod extractors;
mod observability;
mod owner;
mod system;
mod types;

pub use error::ApiError;
pub use observability::BoardOutcome;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    /// Peers allowed to name the voter through forwarded headers.
    pub trusted_proxies: Vec<IpAddr>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn request_service(&self) -> &Arc<dyn RequestService> {
        &self.shared.request_service
    }
}

pub async fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let trusted_proxies = shared.config.read().await.server.trusted_proxies();

    Arc::new(AppState {
        shared,
        trusted_proxies,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle).await)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(routes::BOARD, get(board::index))
        .route("/add", post(board::add_request))
        .route("/vote/{id}", get(board::vote))
        .route(routes::OWNER_PANEL, get(owner::owner_panel))
        .route(
            "/update_status/{id}/{new_status}",
            get(owner::update_status),
        )
        .route("/update_progress/{id}", post(owner::update_progress))
        .route("/delete/{id}", get(owner::delete_request))
        .route("/health/live", get(system::health_live))
        .route("/health/ready", get(system::health_ready))
        .route("/metrics", get(system::get_metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::track_requests))
}
