use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Unchecked,
    Checked,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Unchecked => "unchecked",
            ProductStatus::Checked => "checked",
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, ProductStatus::Checked)
    }

    pub fn toggled(&self) -> Self {
        match self {
            ProductStatus::Unchecked => ProductStatus::Checked,
            ProductStatus::Checked => ProductStatus::Unchecked,
        }
    }
}

impl From<bool> for ProductStatus {
    fn from(checked: bool) -> Self {
        if checked {
            ProductStatus::Checked
        } else {
            ProductStatus::Unchecked
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "checked" | "true" => Ok(ProductStatus::Checked),
            "unchecked" | "false" => Ok(ProductStatus::Unchecked),
            other => Err(format!("unknown product status `{other}`")),
        }
    }
}

/// How the remote resource stores a product's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusField {
    /// Boolean `checked` field.
    Checked,
    /// String `status` field holding `checked` or `unchecked`.
    Status,
}

impl StatusField {
    pub fn key(&self) -> &'static str {
        match self {
            StatusField::Checked => "checked",
            StatusField::Status => "status",
        }
    }

    /// Query parameter value for a server-side status filter.
    pub fn query_value(&self, status: ProductStatus) -> &'static str {
        match self {
            StatusField::Checked => {
                if status.is_checked() {
                    "true"
                } else {
                    "false"
                }
            }
            StatusField::Status => status.as_str(),
        }
    }

    /// JSON value written into request bodies.
    pub fn body_value(&self, status: ProductStatus) -> serde_json::Value {
        match self {
            StatusField::Checked => serde_json::Value::Bool(status.is_checked()),
            StatusField::Status => serde_json::Value::String(status.as_str().to_string()),
        }
    }
}

impl FromStr for StatusField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "checked" => Ok(StatusField::Checked),
            "status" => Ok(StatusField::Status),
            other => Err(format!("expected `checked` or `status`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
