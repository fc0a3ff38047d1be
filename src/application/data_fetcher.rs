// Data fetcher - loads the three dashboard lists through the query cache
use crate::application::crm_repository::CrmRepository;
use crate::application::query_cache::{Cacheable, QueryCache};
use crate::domain::customer::Customer;
use crate::domain::dashboard::Section;
use crate::domain::deal::Deal;
use crate::domain::interaction::Interaction;
use crate::domain::page::{Page, PageRequest};
use crate::error::{CrmError, CrmResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Each fetch is independent: one list failing or timing out yields a failed
/// section with no records and leaves the others untouched.
#[derive(Clone)]
pub struct DataFetcher {
    repository: Arc<dyn CrmRepository>,
    cache: QueryCache,
    page_limit: u32,
    timeout: Duration,
}

impl DataFetcher {
    pub fn new(
        repository: Arc<dyn CrmRepository>,
        cache: QueryCache,
        page_limit: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            page_limit,
            timeout,
        }
    }

    pub async fn fetch_deals(&self) -> Section<Deal> {
        let request = PageRequest::first(self.page_limit);
        self.fetch_section(&request, self.repository.list_deals(&request))
            .await
    }

    pub async fn fetch_customers(&self) -> Section<Customer> {
        let request = PageRequest::first(self.page_limit);
        self.fetch_section(&request, self.repository.list_customers(&request))
            .await
    }

    pub async fn fetch_interactions(&self) -> Section<Interaction> {
        let request = PageRequest::first(self.page_limit);
        self.fetch_section(&request, self.repository.list_interactions(&request))
            .await
    }

    async fn fetch_section<T, Fut>(&self, request: &PageRequest, fetch: Fut) -> Section<T>
    where
        T: Cacheable + Clone,
        Fut: Future<Output = CrmResult<Page<T>>>,
    {
        let resource = T::RESOURCE;
        let outcome = tokio::time::timeout(self.timeout, self.cache.get_or_fetch(request, fetch))
            .await
            .unwrap_or_else(|_| Err(CrmError::Timeout(self.timeout)));

        match outcome {
            Ok(page) => {
                tracing::debug!("Fetched {} {} for dashboard", page.data.len(), resource);
                Section::ready(resource, page.data.clone())
            }
            Err(e) => {
                tracing::warn!("Dashboard section {} failed: {}", resource, e);
                Section::failed(resource, e.to_string())
            }
        }
    }
}
