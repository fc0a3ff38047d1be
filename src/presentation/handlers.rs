// HTTP request handlers
use crate::error::CrmError;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::infrastructure::json_mapper::dashboard_to_view;
use crate::domain::page::PageRequest;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

type HandlerResult = Result<Response, CrmError>;

async fn render<T: Serialize>(status: StatusCode, data: &T, headers: &HeaderMap) -> Response {
    match json_response(status, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Whole dashboard in one response. Sections that failed to load are listed
/// with their error; the rest render normally.
pub async fn get_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let dashboard = state.dashboard_service.get_dashboard().await;
    render(StatusCode::OK, &dashboard_to_view(dashboard), &headers).await
}

/// Stream the dashboard (progressive loading)
pub async fn stream_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let rx = state.streaming_service.stream_dashboard();
    stream_from_receiver(rx, accepts_brotli(&headers))
}

/// Drop every cached list page.
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> StatusCode {
    state.record_service.clear_cache();
    tracing::info!("Query cache cleared");
    StatusCode::NO_CONTENT
}

pub async fn list_customers(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Query(request): Query<PageRequest>,
) -> HandlerResult {
    let page = state.record_service.list_customers(&request).await?;
    Ok(render(StatusCode::OK, &*page, &headers).await)
}

pub async fn get_customer(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let customer = state.record_service.get_customer(&id).await?;
    Ok(render(StatusCode::OK, &customer, &headers).await)
}

pub async fn create_customer(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> HandlerResult {
    let customer = state.record_service.create_customer(&payload).await?;
    Ok(render(StatusCode::CREATED, &customer, &headers).await)
}

pub async fn update_customer(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> HandlerResult {
    let customer = state.record_service.update_customer(&id, &patch).await?;
    Ok(render(StatusCode::OK, &customer, &headers).await)
}

pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, CrmError> {
    state.record_service.delete_customer(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_deals(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Query(request): Query<PageRequest>,
) -> HandlerResult {
    let page = state.record_service.list_deals(&request).await?;
    Ok(render(StatusCode::OK, &*page, &headers).await)
}

pub async fn get_deal(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let deal = state.record_service.get_deal(&id).await?;
    Ok(render(StatusCode::OK, &deal, &headers).await)
}

pub async fn create_deal(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> HandlerResult {
    let deal = state.record_service.create_deal(&payload).await?;
    Ok(render(StatusCode::CREATED, &deal, &headers).await)
}

pub async fn update_deal(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> HandlerResult {
    let deal = state.record_service.update_deal(&id, &patch).await?;
    Ok(render(StatusCode::OK, &deal, &headers).await)
}

pub async fn delete_deal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, CrmError> {
    state.record_service.delete_deal(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn deal_statistics(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let statistics = state.record_service.deal_statistics().await?;
    Ok(render(StatusCode::OK, &statistics, &headers).await)
}

pub async fn list_interactions(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Query(request): Query<PageRequest>,
) -> HandlerResult {
    let page = state.record_service.list_interactions(&request).await?;
    Ok(render(StatusCode::OK, &*page, &headers).await)
}

pub async fn get_interaction(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let interaction = state.record_service.get_interaction(&id).await?;
    Ok(render(StatusCode::OK, &interaction, &headers).await)
}

pub async fn create_interaction(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> HandlerResult {
    let interaction = state.record_service.create_interaction(&payload).await?;
    Ok(render(StatusCode::CREATED, &interaction, &headers).await)
}

pub async fn update_interaction(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> HandlerResult {
    let interaction = state.record_service.update_interaction(&id, &patch).await?;
    Ok(render(StatusCode::OK, &interaction, &headers).await)
}

pub async fn delete_interaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, CrmError> {
    state.record_service.delete_interaction(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
