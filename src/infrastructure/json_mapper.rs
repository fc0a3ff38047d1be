// Mapper to convert domain models to JSON view types
use crate::domain::aggregation::{Bucket, Buckets, DashboardAggregate, RecentDeal, RejectedAmount};
use crate::domain::dashboard::{Dashboard, DashboardEvent, SectionReport, SectionStatus};
use crate::domain::money::format_currency;
use crate::domain::resource::Resource;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub sections: Vec<SectionView>,
    pub summary: SummaryView,
    pub deals_by_status: Vec<Bucket<u64>>,
    pub value_by_status: Vec<AmountPoint>,
    pub rejected_values: Vec<RejectedView>,
    pub customers_by_contact_method: Vec<Bucket<u64>>,
    pub interactions_by_type: Vec<Bucket<u64>>,
    pub recent_deals: Vec<RecentDealView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub resource: Resource,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub record_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub total_deals: usize,
    pub total_customers: usize,
    pub total_interactions: usize,
    pub completed_interactions: usize,
    pub total_value: Decimal,
    pub total_value_display: String,
}

/// One bar of the value chart. `value` is exact; `display` is for labels.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountPoint {
    pub key: String,
    pub value: Decimal,
    pub display: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedView {
    pub deal_id: String,
    pub raw_value: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentDealView {
    pub id: String,
    pub title: String,
    pub customer_name: String,
    pub value: String,
    pub display_value: Option<String>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// One frame of the progressive dashboard stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StreamMessage {
    Skeleton { sections: Vec<Resource> },
    Section(SectionView),
    Aggregate(Box<DashboardView>),
    Complete { elapsed_ms: u64 },
}

pub fn dashboard_to_view(dashboard: Dashboard) -> DashboardView {
    let Dashboard {
        sections,
        aggregate,
    } = dashboard;
    let DashboardAggregate {
        summary,
        deals_by_status,
        value_by_status,
        customers_by_contact_method,
        interactions_by_type,
        recent_deals,
    } = aggregate;

    DashboardView {
        sections: sections.into_iter().map(section_to_view).collect(),
        summary: SummaryView {
            total_deals: summary.total_deals,
            total_customers: summary.total_customers,
            total_interactions: summary.total_interactions,
            completed_interactions: summary.completed_interactions,
            total_value: summary.total_value,
            total_value_display: format_currency(summary.total_value),
        },
        deals_by_status: counts(deals_by_status),
        value_by_status: value_by_status.buckets.iter().map(amount_point).collect(),
        rejected_values: value_by_status.rejected.into_iter().map(rejected_to_view).collect(),
        customers_by_contact_method: counts(customers_by_contact_method),
        interactions_by_type: counts(interactions_by_type),
        recent_deals: recent_deals.into_iter().map(recent_deal_to_view).collect(),
    }
}

pub fn event_to_message(event: DashboardEvent) -> StreamMessage {
    match event {
        DashboardEvent::Skeleton { sections } => StreamMessage::Skeleton { sections },
        DashboardEvent::Section(report) => StreamMessage::Section(section_to_view(report)),
        DashboardEvent::Aggregate(dashboard) => {
            StreamMessage::Aggregate(Box::new(dashboard_to_view(*dashboard)))
        }
        DashboardEvent::Complete { elapsed_ms } => StreamMessage::Complete { elapsed_ms },
    }
}

fn section_to_view(report: SectionReport) -> SectionView {
    let (status, error) = match report.status {
        SectionStatus::Ready => ("ready", None),
        SectionStatus::Failed { message } => ("failed", Some(message)),
    };

    SectionView {
        resource: report.resource,
        status,
        error,
        record_count: report.record_count,
    }
}

fn counts(buckets: Buckets<u64>) -> Vec<Bucket<u64>> {
    buckets.iter().cloned().collect()
}

fn amount_point(bucket: &Bucket<Decimal>) -> AmountPoint {
    AmountPoint {
        key: bucket.key.clone(),
        value: bucket.value,
        display: format_currency(bucket.value),
    }
}

fn rejected_to_view(rejected: RejectedAmount) -> RejectedView {
    RejectedView {
        reason: rejected.reason.to_string(),
        deal_id: rejected.deal_id,
        raw_value: rejected.raw_value,
    }
}

fn recent_deal_to_view(deal: RecentDeal) -> RecentDealView {
    RecentDealView {
        display_value: deal.amount.map(format_currency),
        id: deal.id,
        title: deal.title,
        customer_name: deal.customer_name,
        value: deal.value,
        status: deal.status,
        created_at: deal.created_at,
    }
}
