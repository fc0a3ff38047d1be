//! Dashboard aggregation.
//!
//! Pure, single-pass reductions over the fetched record lists. Nothing here
//! performs I/O or mutates its input; every function is deterministic for a
//! given snapshot.
//!
//! Bucket contents never depend on input order. Bucket *order* is first-seen,
//! which is the order charts render in.

use super::customer::Customer;
use super::deal::Deal;
use super::interaction::Interaction;
use super::money::MoneyError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Bucket for records whose key is missing or blank.
///
/// A record that literally carries `"UNKNOWN"` is counted here too; the
/// charts cannot tell the two apart.
pub const UNKNOWN_BUCKET: &str = "UNKNOWN";

/// Display name for a deal whose customer is not in the fetched page.
pub const UNKNOWN_CUSTOMER: &str = "Unknown customer";

pub const DEFAULT_RECENT_DEALS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket<V> {
    pub key: String,
    pub value: V,
}

/// Keyed accumulator that remembers first-seen key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets<V> {
    entries: Vec<Bucket<V>>,
    index: HashMap<String, usize>,
}

impl<V> Default for Buckets<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> Buckets<V> {
    pub fn iter(&self) -> impl Iterator<Item = &Bucket<V>> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|b| &b.value)
    }
}

#[cfg(test)]
impl<V> Buckets<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|b| b.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Default> Buckets<V> {
    fn slot(&mut self, key: &str) -> &mut V {
        let key = normalise_key(key);
        let existing = self.index.get(key).copied();
        let i = match existing {
            Some(i) => i,
            None => {
                self.entries.push(Bucket {
                    key: key.to_string(),
                    value: V::default(),
                });
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].value
    }
}

fn normalise_key(key: &str) -> &str {
    let trimmed = key.trim();
    if trimmed.is_empty() { UNKNOWN_BUCKET } else { trimmed }
}

/// Count records per key. Blank keys are counted under [`UNKNOWN_BUCKET`].
pub fn group_count_by_key<'a, T, K, F>(records: &'a [T], key_fn: F) -> Buckets<u64>
where
    F: Fn(&'a T) -> K,
    K: AsRef<str>,
{
    let mut buckets = Buckets::default();
    for record in records {
        *buckets.slot(key_fn(record).as_ref()) += 1;
    }
    buckets
}

/// A deal whose value was left out of the monetary totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedAmount {
    pub deal_id: String,
    pub raw_value: String,
    pub reason: MoneyError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueByStatus {
    pub buckets: Buckets<Decimal>,
    pub rejected: Vec<RejectedAmount>,
}

/// Sum deal values per status.
///
/// Values that are empty, malformed or negative are excluded from every sum
/// and reported in `rejected`. The deal's status still gets a bucket so this
/// chart and the count-by-status chart share keys.
pub fn sum_value_by_status(deals: &[Deal]) -> ValueByStatus {
    let mut result = ValueByStatus::default();

    for deal in deals {
        let slot = result.buckets.slot(deal.status.label());
        match deal.amount() {
            Ok(amount) => *slot += amount,
            Err(reason) => {
                tracing::warn!(
                    deal_id = %deal.id,
                    value = %deal.value,
                    error = %reason,
                    "Excluding deal value from totals"
                );
                result.rejected.push(RejectedAmount {
                    deal_id: deal.id.clone(),
                    raw_value: deal.value.clone(),
                    reason,
                });
            }
        }
    }

    result
}

pub fn total_across_buckets(buckets: &Buckets<Decimal>) -> Decimal {
    buckets.values().copied().sum()
}

/// The `n` most recently created deals, newest first.
///
/// The sort is stable, so deals with equal `created_at` keep their input
/// order. Deals without a usable timestamp come after every dated one.
pub fn top_n_recent(deals: &[Deal], n: usize) -> Vec<&Deal> {
    let mut sorted: Vec<&Deal> = deals.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(n);
    sorted
}

/// Company name of the deal's customer, or [`UNKNOWN_CUSTOMER`] if the
/// reference dangles.
pub fn join_customer_name<'a>(deal: &Deal, customers: &'a [Customer]) -> &'a str {
    customers
        .iter()
        .find(|c| c.id == deal.customer_id)
        .map(|c| c.company_name.as_str())
        .unwrap_or(UNKNOWN_CUSTOMER)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_deals: usize,
    pub total_customers: usize,
    pub total_interactions: usize,
    pub completed_interactions: usize,
    pub total_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentDeal {
    pub id: String,
    pub title: String,
    pub customer_name: String,
    pub value: String,
    pub amount: Option<Decimal>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardAggregate {
    pub summary: DashboardSummary,
    pub deals_by_status: Buckets<u64>,
    pub value_by_status: ValueByStatus,
    pub customers_by_contact_method: Buckets<u64>,
    pub interactions_by_type: Buckets<u64>,
    pub recent_deals: Vec<RecentDeal>,
}

impl Default for DashboardSummary {
    fn default() -> Self {
        Self {
            total_deals: 0,
            total_customers: 0,
            total_interactions: 0,
            completed_interactions: 0,
            total_value: Decimal::ZERO,
        }
    }
}

/// Everything the dashboard shows, derived from one snapshot of the lists.
pub fn aggregate_dashboard(
    deals: &[Deal],
    customers: &[Customer],
    interactions: &[Interaction],
    recent_n: usize,
) -> DashboardAggregate {
    let value_by_status = sum_value_by_status(deals);

    let recent_deals = top_n_recent(deals, recent_n)
        .into_iter()
        .map(|deal| RecentDeal {
            id: deal.id.clone(),
            title: deal.title.clone(),
            customer_name: join_customer_name(deal, customers).to_string(),
            value: deal.value.clone(),
            amount: deal.amount().ok(),
            status: normalise_key(deal.status.label()).to_string(),
            created_at: deal.created_at,
        })
        .collect();

    DashboardAggregate {
        summary: DashboardSummary {
            total_deals: deals.len(),
            total_customers: customers.len(),
            total_interactions: interactions.len(),
            completed_interactions: interactions.iter().filter(|i| i.is_completed()).count(),
            total_value: total_across_buckets(&value_by_status.buckets),
        },
        deals_by_status: group_count_by_key(deals, |d| d.status.label()),
        value_by_status,
        customers_by_contact_method: group_count_by_key(customers, |c| {
            c.preferred_contact_method.label()
        }),
        interactions_by_type: group_count_by_key(interactions, |i| i.kind.label()),
        recent_deals,
    }
}
