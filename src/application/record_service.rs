// Record service - CRUD use cases for customers, deals and interactions
use crate::application::crm_repository::CrmRepository;
use crate::application::query_cache::QueryCache;
use crate::domain::customer::Customer;
use crate::domain::deal::Deal;
use crate::domain::interaction::Interaction;
use crate::domain::page::{Page, PageRequest};
use crate::domain::resource::Resource;
use crate::error::CrmResult;
use serde_json::Value;
use std::sync::Arc;

/// Lists are served through the query cache. A successful mutation
/// invalidates the cached pages it could have changed; a failed one leaves
/// the cache alone.
#[derive(Clone)]
pub struct RecordService {
    repository: Arc<dyn CrmRepository>,
    cache: QueryCache,
}

impl RecordService {
    pub fn new(repository: Arc<dyn CrmRepository>, cache: QueryCache) -> Self {
        Self { repository, cache }
    }

    async fn invalidate(&self, resources: &[Resource]) {
        for &resource in resources {
            self.cache.invalidate(resource).await;
        }
    }

    pub async fn list_customers(&self, request: &PageRequest) -> CrmResult<Arc<Page<Customer>>> {
        let request = request.scoped_to(Resource::Customers);
        self.cache
            .get_or_fetch(&request, self.repository.list_customers(&request))
            .await
    }

    pub async fn get_customer(&self, id: &str) -> CrmResult<Customer> {
        self.repository.get_customer(id).await
    }

    pub async fn create_customer(&self, payload: &Value) -> CrmResult<Customer> {
        let customer = self.repository.create_customer(payload).await?;
        tracing::info!("Created customer {}", customer.id);
        self.invalidate(&[Resource::Customers]).await;
        Ok(customer)
    }

    pub async fn update_customer(&self, id: &str, patch: &Value) -> CrmResult<Customer> {
        let customer = self.repository.update_customer(id, patch).await?;
        self.invalidate(&[Resource::Customers]).await;
        Ok(customer)
    }

    /// Deleting a customer also invalidates deals and interactions, whose
    /// cached pages may reference it.
    pub async fn delete_customer(&self, id: &str) -> CrmResult<()> {
        self.repository.delete_customer(id).await?;
        tracing::info!("Deleted customer {}", id);
        self.invalidate(&Resource::ALL).await;
        Ok(())
    }

    pub async fn list_deals(&self, request: &PageRequest) -> CrmResult<Arc<Page<Deal>>> {
        let request = request.scoped_to(Resource::Deals);
        self.cache
            .get_or_fetch(&request, self.repository.list_deals(&request))
            .await
    }

    pub async fn get_deal(&self, id: &str) -> CrmResult<Deal> {
        self.repository.get_deal(id).await
    }

    pub async fn create_deal(&self, payload: &Value) -> CrmResult<Deal> {
        let deal = self.repository.create_deal(payload).await?;
        tracing::info!("Created deal {}", deal.id);
        self.invalidate(&[Resource::Deals]).await;
        Ok(deal)
    }

    pub async fn update_deal(&self, id: &str, patch: &Value) -> CrmResult<Deal> {
        let deal = self.repository.update_deal(id, patch).await?;
        self.invalidate(&[Resource::Deals]).await;
        Ok(deal)
    }

    pub async fn delete_deal(&self, id: &str) -> CrmResult<()> {
        self.repository.delete_deal(id).await?;
        tracing::info!("Deleted deal {}", id);
        self.invalidate(&[Resource::Deals]).await;
        Ok(())
    }

    pub async fn deal_statistics(&self) -> CrmResult<Value> {
        self.repository.deal_statistics().await
    }

    pub async fn list_interactions(
        &self,
        request: &PageRequest,
    ) -> CrmResult<Arc<Page<Interaction>>> {
        let request = request.scoped_to(Resource::Interactions);
        self.cache
            .get_or_fetch(&request, self.repository.list_interactions(&request))
            .await
    }

    pub async fn get_interaction(&self, id: &str) -> CrmResult<Interaction> {
        self.repository.get_interaction(id).await
    }

    pub async fn create_interaction(&self, payload: &Value) -> CrmResult<Interaction> {
        let interaction = self.repository.create_interaction(payload).await?;
        tracing::info!("Created interaction {}", interaction.id);
        self.invalidate(&[Resource::Interactions]).await;
        Ok(interaction)
    }

    pub async fn update_interaction(&self, id: &str, patch: &Value) -> CrmResult<Interaction> {
        let interaction = self.repository.update_interaction(id, patch).await?;
        self.invalidate(&[Resource::Interactions]).await;
        Ok(interaction)
    }

    pub async fn delete_interaction(&self, id: &str) -> CrmResult<()> {
        self.repository.delete_interaction(id).await?;
        tracing::info!("Deleted interaction {}", id);
        self.invalidate(&[Resource::Interactions]).await;
        Ok(())
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }
}
