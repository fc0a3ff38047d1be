// Deal domain model
use super::labels::label_enum;
use super::lenient;
use super::money::{self, MoneyError};
use super::timestamp;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

label_enum! {
    DealStatus {
        Open => "OPEN",
        InProgress => "IN_PROGRESS",
        Won => "WON",
        Lost => "LOST",
    }
}

label_enum! {
    DealPriority {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Decimal string exactly as the API sent it.
    #[serde(default, deserialize_with = "money::raw_amount")]
    pub value: String,
    #[serde(default)]
    pub status: DealStatus,
    #[serde(default)]
    pub priority: DealPriority,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub expected_close_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub customer_id: String,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Deal {
    pub fn amount(&self) -> Result<Decimal, MoneyError> {
        money::parse_money(&self.value)
    }
}
