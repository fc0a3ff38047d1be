// CRM collaborator API repository implementation
use crate::application::crm_repository::CrmRepository;
use crate::domain::customer::Customer;
use crate::domain::deal::Deal;
use crate::domain::interaction::Interaction;
use crate::domain::page::{Page, PageRequest};
use crate::domain::resource::Resource;
use crate::error::{CrmError, CrmResult};
use crate::infrastructure::config::ApiSettings;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, COOKIE, HeaderMap, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CrmApiRepository {
    client: reqwest::Client,
    base_url: String,
}

impl CrmApiRepository {
    pub fn new(settings: &ApiSettings) -> CrmResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &settings.token {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
        }
        if let Some(cookie) = &settings.session_cookie {
            headers.insert(COOKIE, header_value(cookie)?);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource.path())
    }

    fn record_url(&self, resource: Resource, id: &str) -> String {
        format!("{}/{}", self.collection_url(resource), urlencoding::encode(id))
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        resource: Resource,
        request: &PageRequest,
    ) -> CrmResult<Page<T>> {
        let request = request.scoped_to(resource);
        tracing::debug!("Listing {} page {} (limit {})", resource, request.page, request.limit);

        let response = self
            .client
            .get(self.collection_url(resource))
            .query(&request.query_pairs())
            .send()
            .await?;

        decode(resource, None, response).await
    }

    async fn fetch_one<T: DeserializeOwned>(&self, resource: Resource, id: &str) -> CrmResult<T> {
        let response = self.client.get(self.record_url(resource, id)).send().await?;
        decode(resource, Some(id), response).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        resource: Resource,
        id: Option<&str>,
        payload: &Value,
    ) -> CrmResult<T> {
        let url = match id {
            Some(id) => self.record_url(resource, id),
            None => self.collection_url(resource),
        };
        tracing::debug!("{} {}", method, url);

        let response = self.client.request(method, url).json(payload).send().await?;
        decode(resource, id, response).await
    }

    async fn delete_one(&self, resource: Resource, id: &str) -> CrmResult<()> {
        let response = self.client.delete(self.record_url(resource, id)).send().await?;
        check_status(resource, Some(id), response).await?;
        Ok(())
    }
}

fn header_value(raw: &str) -> CrmResult<HeaderValue> {
    HeaderValue::from_str(raw)
        .map_err(|e| CrmError::InvalidConfig(format!("invalid header value: {e}")))
}

async fn check_status(resource: Resource, id: Option<&str>, response: Response) -> CrmResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
        return Err(CrmError::NotFound {
            resource,
            id: id.to_string(),
        });
    }

    let body = response.text().await.unwrap_or_default();
    Err(CrmError::Status { status, body })
}

async fn decode<T: DeserializeOwned>(
    resource: Resource,
    id: Option<&str>,
    response: Response,
) -> CrmResult<T> {
    let bytes = check_status(resource, id, response).await?.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl CrmRepository for CrmApiRepository {
    async fn list_customers(&self, request: &PageRequest) -> CrmResult<Page<Customer>> {
        self.fetch_page(Resource::Customers, request).await
    }

    async fn get_customer(&self, id: &str) -> CrmResult<Customer> {
        self.fetch_one(Resource::Customers, id).await
    }

    async fn create_customer(&self, payload: &Value) -> CrmResult<Customer> {
        self.send_json(Method::POST, Resource::Customers, None, payload).await
    }

    async fn update_customer(&self, id: &str, patch: &Value) -> CrmResult<Customer> {
        self.send_json(Method::PATCH, Resource::Customers, Some(id), patch).await
    }

    async fn delete_customer(&self, id: &str) -> CrmResult<()> {
        self.delete_one(Resource::Customers, id).await
    }

    async fn list_deals(&self, request: &PageRequest) -> CrmResult<Page<Deal>> {
        self.fetch_page(Resource::Deals, request).await
    }

    async fn get_deal(&self, id: &str) -> CrmResult<Deal> {
        self.fetch_one(Resource::Deals, id).await
    }

    async fn create_deal(&self, payload: &Value) -> CrmResult<Deal> {
        self.send_json(Method::POST, Resource::Deals, None, payload).await
    }

    async fn update_deal(&self, id: &str, patch: &Value) -> CrmResult<Deal> {
        self.send_json(Method::PATCH, Resource::Deals, Some(id), patch).await
    }

    async fn delete_deal(&self, id: &str) -> CrmResult<()> {
        self.delete_one(Resource::Deals, id).await
    }

    async fn deal_statistics(&self) -> CrmResult<Value> {
        let url = format!("{}/statistics", self.collection_url(Resource::Deals));
        let response = self.client.get(url).send().await?;
        decode(Resource::Deals, None, response).await
    }

    async fn list_interactions(&self, request: &PageRequest) -> CrmResult<Page<Interaction>> {
        self.fetch_page(Resource::Interactions, request).await
    }

    async fn get_interaction(&self, id: &str) -> CrmResult<Interaction> {
        self.fetch_one(Resource::Interactions, id).await
    }

    async fn create_interaction(&self, payload: &Value) -> CrmResult<Interaction> {
        self.send_json(Method::POST, Resource::Interactions, None, payload).await
    }

    async fn update_interaction(&self, id: &str, patch: &Value) -> CrmResult<Interaction> {
        self.send_json(Method::PATCH, Resource::Interactions, Some(id), patch).await
    }

    async fn delete_interaction(&self, id: &str) -> CrmResult<()> {
        self.delete_one(Resource::Interactions, id).await
    }
}
