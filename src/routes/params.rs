use axum::extract::{FromRequestParts, Query};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Product, ProductStatus},
};

pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Checked,
    Unchecked,
}

impl StatusFilter {
    pub fn as_status(&self) -> Option<ProductStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Checked => Some(ProductStatus::Checked),
            StatusFilter::Unchecked => Some(ProductStatus::Unchecked),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.as_status().is_none_or(|status| product.status == status)
    }

    /// Parses the legacy boolean `checked` URL parameter.
    fn from_legacy(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "true" => Ok(StatusFilter::Checked),
            "false" => Ok(StatusFilter::Unchecked),
            other => Err(AppError::BadRequest(format!(
                "checked must be true, false or all, got `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Name,
    CreatedAt,
    #[default]
    UpdatedAt,
}

impl SortBy {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::CreatedAt => "createdAt",
            SortBy::UpdatedAt => "updatedAt",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// A replayable list request against the product collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub status: StatusFilter,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            status: StatusFilter::All,
            sort_by: SortBy::UpdatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

impl ListQuery {
    pub fn normalize(mut self) -> Self {
        self.page = self.page.max(1);
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// URL query parameters accepted by the list endpoints.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub status: Option<StatusFilter>,
    /// Legacy boolean filter, used only when `status` is absent.
    pub checked: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ProductQuery {
    pub fn into_list_query(self, default_page_size: u32) -> AppResult<ListQuery> {
        let status = match (self.status, self.checked.as_deref()) {
            (Some(status), _) => status,
            (None, Some(legacy)) => StatusFilter::from_legacy(legacy)?,
            (None, None) => StatusFilter::All,
        };

        Ok(ListQuery {
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(default_page_size),
            status,
            sort_by: self.sort_by.unwrap_or_default(),
            sort_order: self.sort_order.unwrap_or_default(),
        }
        .normalize())
    }
}

/// `Query<ProductQuery>` whose rejection uses the `AppError` envelope.
pub struct ListParams(pub ProductQuery);

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ProductQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(query))
    }
}
