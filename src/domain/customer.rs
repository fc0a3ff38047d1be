// Customer domain model
use super::labels::label_enum;
use super::lenient;
use super::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

label_enum! {
    /// How a customer prefers to be contacted.
    ContactMethod {
        Email => "EMAIL",
        Phone => "PHONE",
        InPerson => "IN_PERSON",
        VideoCall => "VIDEO_CALL",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub contact_name: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub preferred_contact_method: ContactMethod,
    #[serde(default = "default_active", deserialize_with = "lenient::active_flag")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}
