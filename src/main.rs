// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::data_fetcher::DataFetcher;
use crate::application::query_cache::QueryCache;
use crate::application::record_service::RecordService;
use crate::application::streaming_service::StreamingDashboardService;
use crate::infrastructure::config::load_config;
use crate::infrastructure::crm_api_repository::CrmApiRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crm_dashboard=info,tower_http=info")),
        )
        .init();

    let config = load_config().context("failed to load configuration")?;

    // Infrastructure
    let repository = Arc::new(CrmApiRepository::new(&config.api)?);
    let cache = QueryCache::new(
        config.cache.max_capacity,
        Duration::from_secs(config.cache.ttl_secs),
    );

    // Application services
    let fetcher = DataFetcher::new(
        repository.clone(),
        cache.clone(),
        config.dashboard.page_limit,
        Duration::from_secs(config.dashboard.fetch_timeout_secs),
    );
    let state = Arc::new(AppState {
        dashboard_service: DashboardService::new(fetcher.clone(), config.dashboard.recent_deals),
        streaming_service: StreamingDashboardService::new(fetcher, config.dashboard.recent_deals),
        record_service: RecordService::new(repository, cache),
    });

    let router = build_router(state);

    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("invalid server.bind_addr '{}'", config.server.bind_addr))?;
    tracing::info!(
        "Starting crm-dashboard on {} (CRM API {})",
        addr,
        config.api.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
