//! Keyed cache of last-good list pages.
//!
//! Pages are keyed by resource plus the normalised page request. Only
//! successful fetches are stored. Mutations call [`QueryCache::invalidate`]
//! with the resource they touched, which drops every cached page of that
//! resource regardless of page number or filters.
//!
//! Each resource also carries a generation counter that `invalidate` bumps.
//! A fetch that was already in flight when its resource was invalidated
//! returns its page to the caller but does not leave it in the cache.

use crate::domain::customer::Customer;
use crate::domain::deal::Deal;
use crate::domain::interaction::Interaction;
use crate::domain::page::{Page, PageRequest};
use crate::domain::resource::Resource;
use crate::error::CrmResult;
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: Resource,
    pub request: PageRequest,
}

impl QueryKey {
    pub fn new(resource: Resource, request: &PageRequest) -> Self {
        Self {
            resource,
            request: request.scoped_to(resource),
        }
    }
}

#[derive(Debug, Clone)]
pub enum CachedPage {
    Customers(Arc<Page<Customer>>),
    Deals(Arc<Page<Deal>>),
    Interactions(Arc<Page<Interaction>>),
}

/// Record types whose pages can live in the cache.
pub trait Cacheable: Sized + Send + Sync + 'static {
    const RESOURCE: Resource;

    fn wrap(page: Arc<Page<Self>>) -> CachedPage;
    fn unwrap(cached: CachedPage) -> Option<Arc<Page<Self>>>;
}

impl Cacheable for Customer {
    const RESOURCE: Resource = Resource::Customers;

    fn wrap(page: Arc<Page<Self>>) -> CachedPage {
        CachedPage::Customers(page)
    }

    fn unwrap(cached: CachedPage) -> Option<Arc<Page<Self>>> {
        match cached {
            CachedPage::Customers(page) => Some(page),
            _ => None,
        }
    }
}

impl Cacheable for Deal {
    const RESOURCE: Resource = Resource::Deals;

    fn wrap(page: Arc<Page<Self>>) -> CachedPage {
        CachedPage::Deals(page)
    }

    fn unwrap(cached: CachedPage) -> Option<Arc<Page<Self>>> {
        match cached {
            CachedPage::Deals(page) => Some(page),
            _ => None,
        }
    }
}

impl Cacheable for Interaction {
    const RESOURCE: Resource = Resource::Interactions;

    fn wrap(page: Arc<Page<Self>>) -> CachedPage {
        CachedPage::Interactions(page)
    }

    fn unwrap(cached: CachedPage) -> Option<Arc<Page<Self>>> {
        match cached {
            CachedPage::Interactions(page) => Some(page),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct QueryCache {
    pages: Cache<QueryKey, CachedPage>,
    generations: Arc<[AtomicU64; 3]>,
}

fn generation_slot(resource: Resource) -> usize {
    match resource {
        Resource::Customers => 0,
        Resource::Deals => 1,
        Resource::Interactions => 2,
    }
}

impl QueryCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let pages = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self {
            pages,
            generations: Arc::new(Default::default()),
        }
    }

    fn generation(&self, resource: Resource) -> u64 {
        self.generations[generation_slot(resource)].load(Ordering::Acquire)
    }

    fn bump_generation(&self, resource: Resource) {
        self.generations[generation_slot(resource)].fetch_add(1, Ordering::AcqRel);
    }

    /// Return the cached page for `request`, or await `fetch` and cache its
    /// result. `fetch` is only polled on a miss; errors are not cached.
    pub async fn get_or_fetch<T, Fut>(
        &self,
        request: &PageRequest,
        fetch: Fut,
    ) -> CrmResult<Arc<Page<T>>>
    where
        T: Cacheable,
        Fut: Future<Output = CrmResult<Page<T>>>,
    {
        let key = QueryKey::new(T::RESOURCE, request);

        if let Some(page) = self.pages.get(&key).await.and_then(T::unwrap) {
            tracing::debug!("Query cache hit for {} page {}", key.resource, key.request.page);
            return Ok(page);
        }

        let generation = self.generation(T::RESOURCE);
        let page = Arc::new(fetch.await?);
        if self.generation(T::RESOURCE) != generation {
            tracing::debug!("{} invalidated during fetch, not caching", key.resource);
            return Ok(page);
        }

        self.pages.insert(key.clone(), T::wrap(page.clone())).await;
        // An invalidation that raced the insert has already swept the keys.
        if self.generation(T::RESOURCE) != generation {
            self.pages.invalidate(&key).await;
        }
        Ok(page)
    }

    /// Drop every cached page of `resource`.
    pub async fn invalidate(&self, resource: Resource) {
        self.bump_generation(resource);
        let stale: Vec<Arc<QueryKey>> = self
            .pages
            .iter()
            .filter(|(key, _)| key.resource == resource)
            .map(|(key, _)| key)
            .collect();

        tracing::debug!("Invalidating {} cached {} pages", stale.len(), resource);
        for key in stale {
            self.pages.invalidate(key.as_ref()).await;
        }
    }

    pub fn invalidate_all(&self) {
        for resource in Resource::ALL {
            self.bump_generation(resource);
        }
        self.pages.invalidate_all();
    }
}
