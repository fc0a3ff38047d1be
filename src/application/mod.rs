// Application layer - Use cases over the CRM repository
pub mod crm_repository;
pub mod dashboard_service;
pub mod data_fetcher;
pub mod query_cache;
pub mod record_service;
pub mod streaming_service;

#[cfg(test)]
pub mod test_support;
