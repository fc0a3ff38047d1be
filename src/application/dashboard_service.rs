// Dashboard service - Use case for building the CRM dashboard
use crate::application::data_fetcher::DataFetcher;
use crate::domain::dashboard::Dashboard;

#[derive(Clone)]
pub struct DashboardService {
    fetcher: DataFetcher,
    recent_deals: usize,
}

impl DashboardService {
    pub fn new(fetcher: DataFetcher, recent_deals: usize) -> Self {
        Self {
            fetcher,
            recent_deals,
        }
    }

    /// Fetch all three lists concurrently, then aggregate whatever came back.
    pub async fn get_dashboard(&self) -> Dashboard {
        let (deals, customers, interactions) = tokio::join!(
            self.fetcher.fetch_deals(),
            self.fetcher.fetch_customers(),
            self.fetcher.fetch_interactions(),
        );

        let dashboard = Dashboard::from_sections(&deals, &customers, &interactions, self.recent_deals);
        for section in dashboard.failed_sections() {
            tracing::warn!("Dashboard rendered without {}", section.resource);
        }
        dashboard
    }
}
