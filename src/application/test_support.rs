// In-memory CRM repository for service and handler tests
use crate::application::crm_repository::CrmRepository;
use crate::domain::customer::Customer;
use crate::domain::deal::Deal;
use crate::domain::interaction::Interaction;
use crate::domain::page::{Page, PageRequest};
use crate::domain::resource::Resource;
use crate::error::{CrmError, CrmResult};
use async_trait::async_trait;
use axum::http::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct InMemoryRepository {
    customers: Mutex<Vec<Customer>>,
    deals: Mutex<Vec<Deal>>,
    interactions: Mutex<Vec<Interaction>>,
    failing: Mutex<HashSet<Resource>>,
    delays: Mutex<HashMap<Resource, Duration>>,
    list_calls: Mutex<HashMap<Resource, usize>>,
    completed_lists: Mutex<HashMap<Resource, usize>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customers(self, customers: Vec<Value>) -> Self {
        *self.customers.lock().unwrap() = decode_all(customers);
        self
    }

    pub fn with_deals(self, deals: Vec<Value>) -> Self {
        *self.deals.lock().unwrap() = decode_all(deals);
        self
    }

    pub fn with_interactions(self, interactions: Vec<Value>) -> Self {
        *self.interactions.lock().unwrap() = decode_all(interactions);
        self
    }

    /// Make every list call for `resource` fail with a 500.
    pub fn failing(self, resource: Resource) -> Self {
        self.failing.lock().unwrap().insert(resource);
        self
    }

    /// Delay every list call for `resource`.
    pub fn delayed(self, resource: Resource, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(resource, delay);
        self
    }

    /// List calls started for `resource`.
    pub fn list_calls(&self, resource: Resource) -> usize {
        *self.list_calls.lock().unwrap().get(&resource).unwrap_or(&0)
    }

    /// List calls that ran to completion for `resource`.
    pub fn completed_lists(&self, resource: Resource) -> usize {
        *self.completed_lists.lock().unwrap().get(&resource).unwrap_or(&0)
    }

    async fn list<T: Clone>(
        &self,
        resource: Resource,
        records: &Mutex<Vec<T>>,
        request: &PageRequest,
    ) -> CrmResult<Page<T>> {
        *self.list_calls.lock().unwrap().entry(resource).or_default() += 1;

        let delay = self.delays.lock().unwrap().get(&resource).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(&resource) {
            return Err(CrmError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: format!("{resource} unavailable"),
            });
        }

        *self.completed_lists.lock().unwrap().entry(resource).or_default() += 1;

        let all = records.lock().unwrap().clone();
        let total = all.len() as u64;
        let start = ((request.page.max(1) - 1) * request.limit) as usize;
        let data = all.into_iter().skip(start).take(request.limit as usize).collect();
        Ok(Page::new(data, request.page, request.limit, total))
    }
}

fn decode_all<T: DeserializeOwned>(values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
}

fn find<T: Clone>(
    records: &Mutex<Vec<T>>,
    resource: Resource,
    id: &str,
    id_of: impl Fn(&T) -> &str,
) -> CrmResult<T> {
    records
        .lock()
        .unwrap()
        .iter()
        .find(|r| id_of(*r) == id)
        .cloned()
        .ok_or_else(|| CrmError::NotFound {
            resource,
            id: id.to_string(),
        })
}

fn create<T: Clone + DeserializeOwned>(
    records: &Mutex<Vec<T>>,
    resource: Resource,
    payload: &Value,
) -> CrmResult<T> {
    let mut records = records.lock().unwrap();
    let mut body = payload.clone();
    if body.get("id").is_none() {
        body["id"] = json!(format!("{}-{}", resource.singular(), records.len() + 1));
    }
    let record: T = serde_json::from_value(body)?;
    records.push(record.clone());
    Ok(record)
}

fn update<T: Clone + Serialize + DeserializeOwned>(
    records: &Mutex<Vec<T>>,
    resource: Resource,
    id: &str,
    patch: &Value,
    id_of: impl Fn(&T) -> &str,
) -> CrmResult<T> {
    let mut records = records.lock().unwrap();
    let slot = records
        .iter_mut()
        .find(|r| id_of(&**r) == id)
        .ok_or_else(|| CrmError::NotFound {
            resource,
            id: id.to_string(),
        })?;

    let mut merged = serde_json::to_value(&*slot)?;
    if let (Some(target), Some(changes)) = (merged.as_object_mut(), patch.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    *slot = serde_json::from_value(merged)?;
    Ok(slot.clone())
}

fn delete<T>(
    records: &Mutex<Vec<T>>,
    resource: Resource,
    id: &str,
    id_of: impl Fn(&T) -> &str,
) -> CrmResult<()> {
    let mut records = records.lock().unwrap();
    let before = records.len();
    records.retain(|r| id_of(r) != id);
    if records.len() == before {
        return Err(CrmError::NotFound {
            resource,
            id: id.to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl CrmRepository for InMemoryRepository {
    async fn list_customers(&self, request: &PageRequest) -> CrmResult<Page<Customer>> {
        self.list(Resource::Customers, &self.customers, request).await
    }

    async fn get_customer(&self, id: &str) -> CrmResult<Customer> {
        find(&self.customers, Resource::Customers, id, |c| c.id.as_str())
    }

    async fn create_customer(&self, payload: &Value) -> CrmResult<Customer> {
        create(&self.customers, Resource::Customers, payload)
    }

    async fn update_customer(&self, id: &str, patch: &Value) -> CrmResult<Customer> {
        update(&self.customers, Resource::Customers, id, patch, |c| c.id.as_str())
    }

    async fn delete_customer(&self, id: &str) -> CrmResult<()> {
        delete(&self.customers, Resource::Customers, id, |c| c.id.as_str())
    }

    async fn list_deals(&self, request: &PageRequest) -> CrmResult<Page<Deal>> {
        self.list(Resource::Deals, &self.deals, request).await
    }

    async fn get_deal(&self, id: &str) -> CrmResult<Deal> {
        find(&self.deals, Resource::Deals, id, |d| d.id.as_str())
    }

    async fn create_deal(&self, payload: &Value) -> CrmResult<Deal> {
        create(&self.deals, Resource::Deals, payload)
    }

    async fn update_deal(&self, id: &str, patch: &Value) -> CrmResult<Deal> {
        update(&self.deals, Resource::Deals, id, patch, |d| d.id.as_str())
    }

    async fn delete_deal(&self, id: &str) -> CrmResult<()> {
        delete(&self.deals, Resource::Deals, id, |d| d.id.as_str())
    }

    async fn deal_statistics(&self) -> CrmResult<Value> {
        Ok(json!({ "count": self.deals.lock().unwrap().len() }))
    }

    async fn list_interactions(&self, request: &PageRequest) -> CrmResult<Page<Interaction>> {
        self.list(Resource::Interactions, &self.interactions, request).await
    }

    async fn get_interaction(&self, id: &str) -> CrmResult<Interaction> {
        find(&self.interactions, Resource::Interactions, id, |i| i.id.as_str())
    }

    async fn create_interaction(&self, payload: &Value) -> CrmResult<Interaction> {
        create(&self.interactions, Resource::Interactions, payload)
    }

    async fn update_interaction(&self, id: &str, patch: &Value) -> CrmResult<Interaction> {
        update(&self.interactions, Resource::Interactions, id, patch, |i| i.id.as_str())
    }

    async fn delete_interaction(&self, id: &str) -> CrmResult<()> {
        delete(&self.interactions, Resource::Interactions, id, |i| i.id.as_str())
    }
}
