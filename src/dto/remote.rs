//! Wire shapes of the remote products resource.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{Product, ProductStatus};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteId {
    Text(String),
    Number(i64),
}

/// A product as the remote returns it. Older records carry a boolean
/// `checked`, newer ones a string `status`; either may be missing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProduct {
    id: RemoteId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    checked: Option<bool>,
    #[serde(default)]
    status: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl RemoteProduct {
    fn status(&self) -> ProductStatus {
        if let Some(raw) = self.status.as_deref() {
            match raw.parse::<ProductStatus>() {
                Ok(status) => return status,
                Err(err) => tracing::warn!(error = %err, "ignoring remote status string"),
            }
        }
        ProductStatus::from(self.checked.unwrap_or(false))
    }

    pub fn into_product(self) -> Product {
        let status = self.status();
        let id = match self.id {
            RemoteId::Text(id) => id,
            RemoteId::Number(id) => id.to_string(),
        };
        Product {
            id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            status,
            created_at: self.created_at,
            updated_at: self.updated_at.unwrap_or(self.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(value: serde_json::Value) -> Product {
        serde_json::from_value::<RemoteProduct>(value)
            .unwrap()
            .into_product()
    }

    #[test]
    fn boolean_checked_is_translated() {
        let product = decode(serde_json::json!({
            "id": "7",
            "name": "Lamp",
            "description": "desk lamp",
            "checked": true,
            "createdAt": "2025-03-23T10:00:00Z",
            "updatedAt": "2025-03-24T10:00:00Z"
        }));
        assert_eq!(product.id, "7");
        assert_eq!(product.status, ProductStatus::Checked);
        assert!(product.updated_at > product.created_at);
    }

    #[test]
    fn status_string_wins_and_gaps_are_filled() {
        let product = decode(serde_json::json!({
            "id": 12,
            "name": "Chair",
            "checked": true,
            "status": "unchecked",
            "createdAt": "2025-03-23T10:00:00Z"
        }));
        assert_eq!(product.id, "12");
        assert_eq!(product.status, ProductStatus::Unchecked);
        assert_eq!(product.description, "");
        assert_eq!(product.updated_at, product.created_at);
    }
}
