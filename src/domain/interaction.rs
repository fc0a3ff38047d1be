// Interaction domain model
use super::labels::label_enum;
use super::lenient;
use super::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

label_enum! {
    InteractionType {
        Call => "CALL",
        Email => "EMAIL",
        Meeting => "MEETING",
        Note => "NOTE",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: InteractionType,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub subject: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub customer_id: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Interaction {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_interaction() {
        let json = r#"{
            "id": "i-1",
            "type": "MEETING",
            "subject": "Kickoff",
            "scheduledAt": "2024-02-01T10:00:00.000Z",
            "customerId": "c-1",
            "userId": "u-1"
        }"#;

        let interaction: Interaction = serde_json::from_str(json).unwrap();
        assert_eq!(interaction.kind, InteractionType::Meeting);
        assert!(interaction.scheduled_at.is_some());
        assert!(!interaction.is_completed());
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let interaction: Interaction =
            serde_json::from_str(r#"{"id": "i-2", "type": "NOTE"}"#).unwrap();
        let json = serde_json::to_value(&interaction).unwrap();
        assert_eq!(json["type"], "NOTE");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_null_strings_decode_as_empty() {
        let json = r#"{"id": "i-3", "type": "CALL", "subject": null,
                       "customerId": null, "userId": null}"#;
        let interaction: Interaction = serde_json::from_str(json).unwrap();
        assert_eq!(interaction.subject, "");
        assert_eq!(interaction.customer_id, "");
        assert_eq!(interaction.user_id, "");
    }
}
