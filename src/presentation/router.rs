// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::*;
use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// Compression is applied in the response builders, per response or per
// stream frame, so there is no CompressionLayer here.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/cache", delete(clear_cache))
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/:id",
            get(get_customer).patch(update_customer).delete(delete_customer),
        )
        .route("/deals", get(list_deals).post(create_deal))
        .route("/deals/statistics", get(deal_statistics))
        .route(
            "/deals/:id",
            get(get_deal).patch(update_deal).delete(delete_deal),
        )
        .route("/interactions", get(list_interactions).post(create_interaction))
        .route(
            "/interactions/:id",
            get(get_interaction)
                .patch(update_interaction)
                .delete(delete_interaction),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::data_fetcher::DataFetcher;
    use crate::application::query_cache::QueryCache;
    use crate::application::record_service::RecordService;
    use crate::application::streaming_service::StreamingDashboardService;
    use crate::application::test_support::InMemoryRepository;
    use crate::domain::resource::Resource;
    use crate::infrastructure::chunked_json::split_frames;
    use crate::infrastructure::http_response::brotli_decompress;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use std::time::Duration;
    use tower::ServiceExt;

    fn seeded() -> InMemoryRepository {
        InMemoryRepository::new()
            .with_customers(vec![
                json!({"id": "c-1", "companyName": "Acme", "preferredContactMethod": "EMAIL"}),
                json!({"id": "c-2", "companyName": "Globex", "preferredContactMethod": "PHONE"}),
            ])
            .with_deals(vec![
                json!({"id": "d-1", "title": "Renewal", "value": "100.00", "status": "OPEN",
                       "customerId": "c-1", "createdAt": "2024-01-01T00:00:00Z"}),
                json!({"id": "d-2", "title": "Upsell", "value": "abc", "status": "WON",
                       "customerId": "c-2", "createdAt": "2024-01-02T00:00:00Z"}),
            ])
            .with_interactions(vec![
                json!({"id": "i-1", "type": "CALL", "customerId": "c-1",
                       "completedAt": "2024-01-03T00:00:00Z"}),
            ])
    }

    fn app(repository: Arc<InMemoryRepository>) -> Router {
        let cache = QueryCache::new(64, Duration::from_secs(60));
        let fetcher = DataFetcher::new(repository.clone(), cache.clone(), 100, Duration::from_secs(5));
        let state = Arc::new(AppState {
            dashboard_service: DashboardService::new(fetcher.clone(), 5),
            streaming_service: StreamingDashboardService::new(fetcher, 5),
            record_service: RecordService::new(repository, cache),
        });
        build_router(state)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app(Arc::new(seeded())).oneshot(get("/healthz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_get_dashboard() {
        let response = app(Arc::new(seeded())).oneshot(get("/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let dashboard = body_json(response).await;
        assert_eq!(dashboard["summary"]["totalDeals"], 2);
        assert_eq!(dashboard["summary"]["completedInteractions"], 1);
        assert_eq!(dashboard["summary"]["totalValueDisplay"], "$100.00");
        assert_eq!(dashboard["rejectedValues"][0]["dealId"], "d-2");
        assert_eq!(dashboard["recentDeals"][0]["customerName"], "Globex");
        assert_eq!(
            dashboard["customersByContactMethod"],
            json!([{"key": "EMAIL", "value": 1}, {"key": "PHONE", "value": 1}])
        );
    }

    #[tokio::test]
    async fn test_get_dashboard_reports_failed_section() {
        let repository = Arc::new(seeded().failing(Resource::Interactions));
        let response = app(repository).oneshot(get("/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let dashboard = body_json(response).await;
        assert_eq!(dashboard["sections"][2]["resource"], "interactions");
        assert_eq!(dashboard["sections"][2]["status"], "failed");
        assert_eq!(dashboard["summary"]["totalInteractions"], 0);
        assert_eq!(dashboard["summary"]["totalDeals"], 2);
    }

    #[tokio::test]
    async fn test_get_dashboard_brotli() {
        let request = Request::builder()
            .uri("/dashboard")
            .header(header::ACCEPT_ENCODING, "gzip, br")
            .body(Body::empty())
            .unwrap();
        let response = app(Arc::new(seeded())).oneshot(request).await.unwrap();
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "br");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let dashboard: Value = serde_json::from_slice(&brotli_decompress(&bytes).await).unwrap();
        assert_eq!(dashboard["summary"]["totalCustomers"], 2);
    }

    #[tokio::test]
    async fn test_stream_dashboard_frames() {
        let response = app(Arc::new(seeded()))
            .oneshot(get("/dashboard/stream"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let types: Vec<String> = split_frames(&bytes)
            .iter()
            .map(|frame| {
                let message: Value = serde_json::from_slice(frame).unwrap();
                message["type"].as_str().unwrap().to_string()
            })
            .collect();

        assert_eq!(
            types,
            vec!["skeleton", "section", "section", "section", "aggregate", "complete"]
        );
    }

    #[tokio::test]
    async fn test_list_deals_with_paging() {
        let response = app(Arc::new(seeded()))
            .oneshot(get("/deals?page=1&limit=1&status=OPEN"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_json(response).await;
        assert_eq!(page["data"].as_array().unwrap().len(), 1);
        assert_eq!(page["meta"]["total"], 2);
        assert_eq!(page["meta"]["totalPages"], 2);
    }

    #[tokio::test]
    async fn test_missing_record_is_404() {
        let response = app(Arc::new(seeded()))
            .oneshot(get("/customers/c-404"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "customer c-404 not found");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_502() {
        let repository = Arc::new(seeded().failing(Resource::Customers));
        let response = app(repository).oneshot(get("/customers")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_create_deal_refreshes_dashboard() {
        let app = app(Arc::new(seeded()));

        let before = body_json(app.clone().oneshot(get("/dashboard")).await.unwrap()).await;
        assert_eq!(before["summary"]["totalDeals"], 2);

        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/deals",
                json!({"title": "Expansion", "value": "50.50", "status": "OPEN", "customerId": "c-1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["title"], "Expansion");

        let after = body_json(app.oneshot(get("/dashboard")).await.unwrap()).await;
        assert_eq!(after["summary"]["totalDeals"], 3);
        assert_eq!(after["summary"]["totalValue"], "150.50");
    }

    #[tokio::test]
    async fn test_update_and_delete_interaction() {
        let app = app(Arc::new(seeded()));

        let response = app
            .clone()
            .oneshot(send_json("PATCH", "/interactions/i-1", json!({"subject": "Kickoff"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["subject"], "Kickoff");

        let delete = Request::builder()
            .method("DELETE")
            .uri("/interactions/i-1")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(get("/interactions/i-1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deal_statistics_route() {
        let response = app(Arc::new(seeded()))
            .oneshot(get("/deals/statistics"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["count"], 2);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let repository = Arc::new(seeded());
        let app = app(repository.clone());

        app.clone().oneshot(get("/customers")).await.unwrap();
        let clear = Request::builder()
            .method("DELETE")
            .uri("/cache")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            app.clone().oneshot(clear).await.unwrap().status(),
            StatusCode::NO_CONTENT
        );
        app.oneshot(get("/customers")).await.unwrap();

        assert_eq!(repository.list_calls(Resource::Customers), 2);
    }
}
