// Repository trait for CRM record access
use crate::domain::customer::Customer;
use crate::domain::deal::Deal;
use crate::domain::interaction::Interaction;
use crate::domain::page::{Page, PageRequest};
use crate::error::CrmResult;
use async_trait::async_trait;
use serde_json::Value;

/// Create and update payloads are forwarded as-is; the CRM API owns validation.
#[async_trait]
pub trait CrmRepository: Send + Sync {
    async fn list_customers(&self, request: &PageRequest) -> CrmResult<Page<Customer>>;
    async fn get_customer(&self, id: &str) -> CrmResult<Customer>;
    async fn create_customer(&self, payload: &Value) -> CrmResult<Customer>;
    async fn update_customer(&self, id: &str, patch: &Value) -> CrmResult<Customer>;
    async fn delete_customer(&self, id: &str) -> CrmResult<()>;

    async fn list_deals(&self, request: &PageRequest) -> CrmResult<Page<Deal>>;
    async fn get_deal(&self, id: &str) -> CrmResult<Deal>;
    async fn create_deal(&self, payload: &Value) -> CrmResult<Deal>;
    async fn update_deal(&self, id: &str, patch: &Value) -> CrmResult<Deal>;
    async fn delete_deal(&self, id: &str) -> CrmResult<()>;

    /// Server-side deal statistics; shape is owned by the CRM API.
    async fn deal_statistics(&self) -> CrmResult<Value>;

    async fn list_interactions(&self, request: &PageRequest) -> CrmResult<Page<Interaction>>;
    async fn get_interaction(&self, id: &str) -> CrmResult<Interaction>;
    async fn create_interaction(&self, payload: &Value) -> CrmResult<Interaction>;
    async fn update_interaction(&self, id: &str, patch: &Value) -> CrmResult<Interaction>;
    async fn delete_interaction(&self, id: &str) -> CrmResult<()>;
}
