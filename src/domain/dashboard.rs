// Dashboard domain model
use super::aggregation::{DashboardAggregate, aggregate_dashboard};
use super::customer::Customer;
use super::deal::Deal;
use super::interaction::Interaction;
use super::resource::Resource;

/// Outcome of fetching one dashboard section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionStatus {
    Ready,
    Failed { message: String },
}

/// One fetched list. A failed fetch carries no records; the section renders
/// empty alongside its error.
#[derive(Debug, Clone)]
pub struct Section<T> {
    pub resource: Resource,
    pub status: SectionStatus,
    pub records: Vec<T>,
}

impl<T> Section<T> {
    pub fn ready(resource: Resource, records: Vec<T>) -> Self {
        Self {
            resource,
            status: SectionStatus::Ready,
            records,
        }
    }

    pub fn failed(resource: Resource, message: impl Into<String>) -> Self {
        Self {
            resource,
            status: SectionStatus::Failed {
                message: message.into(),
            },
            records: Vec::new(),
        }
    }

    pub fn report(&self) -> SectionReport {
        SectionReport {
            resource: self.resource,
            status: self.status.clone(),
            record_count: self.records.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub resource: Resource,
    pub status: SectionStatus,
    pub record_count: usize,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub sections: Vec<SectionReport>,
    pub aggregate: DashboardAggregate,
}

impl Dashboard {
    pub fn from_sections(
        deals: &Section<Deal>,
        customers: &Section<Customer>,
        interactions: &Section<Interaction>,
        recent_deals: usize,
    ) -> Self {
        let aggregate = aggregate_dashboard(
            &deals.records,
            &customers.records,
            &interactions.records,
            recent_deals,
        );

        Self {
            sections: vec![deals.report(), customers.report(), interactions.report()],
            aggregate,
        }
    }

    pub fn failed_sections(&self) -> impl Iterator<Item = &SectionReport> {
        self.sections
            .iter()
            .filter(|s| matches!(s.status, SectionStatus::Failed { .. }))
    }
}

/// Progress of a streamed dashboard, in emission order.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    Skeleton { sections: Vec<Resource> },
    Section(SectionReport),
    Aggregate(Box<Dashboard>),
    Complete { elapsed_ms: u64 },
}
