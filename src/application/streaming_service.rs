// Streaming dashboard service - Progressive loading over framed JSON
use crate::application::data_fetcher::DataFetcher;
use crate::domain::dashboard::{Dashboard, DashboardEvent, Section};
use crate::domain::resource::Resource;
use std::time::Instant;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct StreamingDashboardService {
    fetcher: DataFetcher,
    recent_deals: usize,
}

impl StreamingDashboardService {
    pub fn new(fetcher: DataFetcher, recent_deals: usize) -> Self {
        Self {
            fetcher,
            recent_deals,
        }
    }

    /// Emit a skeleton, one section report per list as it resolves, the full
    /// dashboard, and a completion event.
    ///
    /// Dropping the receiver cancels the outstanding fetches; nothing is sent
    /// after that.
    pub fn stream_dashboard(&self) -> mpsc::Receiver<DashboardEvent> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let fetcher = self.fetcher.clone();
        let recent_deals = self.recent_deals;

        tokio::spawn(async move {
            if produce(fetcher, recent_deals, tx).await.is_none() {
                tracing::debug!("Dashboard stream consumer went away, stopping");
            }
        });

        rx
    }
}

async fn produce(
    fetcher: DataFetcher,
    recent_deals: usize,
    tx: mpsc::Sender<DashboardEvent>,
) -> Option<()> {
    let start_time = Instant::now();

    let skeleton = DashboardEvent::Skeleton {
        sections: Resource::ALL.to_vec(),
    };
    tx.send(skeleton).await.ok()?;

    let deals_fut = fetcher.fetch_deals();
    let customers_fut = fetcher.fetch_customers();
    let interactions_fut = fetcher.fetch_interactions();
    tokio::pin!(deals_fut, customers_fut, interactions_fut);

    let mut deals: Option<Section<_>> = None;
    let mut customers: Option<Section<_>> = None;
    let mut interactions: Option<Section<_>> = None;

    while deals.is_none() || customers.is_none() || interactions.is_none() {
        let report = tokio::select! {
            _ = tx.closed() => return None,
            section = &mut deals_fut, if deals.is_none() => {
                deals.insert(section).report()
            }
            section = &mut customers_fut, if customers.is_none() => {
                customers.insert(section).report()
            }
            section = &mut interactions_fut, if interactions.is_none() => {
                interactions.insert(section).report()
            }
        };
        tx.send(DashboardEvent::Section(report)).await.ok()?;
    }

    let (deals, customers, interactions) = (deals?, customers?, interactions?);
    let dashboard = Dashboard::from_sections(&deals, &customers, &interactions, recent_deals);
    tx.send(DashboardEvent::Aggregate(Box::new(dashboard))).await.ok()?;

    let elapsed_ms = start_time.elapsed().as_millis() as u64;
    tx.send(DashboardEvent::Complete { elapsed_ms }).await.ok()
}
