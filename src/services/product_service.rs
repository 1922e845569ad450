use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use url::Url;

use crate::{
    config::AppConfig,
    dto::{
        products::{CreateProductRequest, UpdateProductRequest},
        remote::RemoteProduct,
    },
    error::{AppError, AppResult},
    events::{ProductEvent, ProductEvents},
    models::{Product, ProductStatus, StatusField},
    routes::params::ListQuery,
};

/// Client for the remote products resource.
///
/// The remote is untrusted: its status filter parameter is sent as a hint,
/// and every listed page is filtered again locally before it is returned.
#[derive(Debug, Clone)]
pub struct ProductService {
    http: Client,
    base_url: Url,
    status_field: StatusField,
    events: ProductEvents,
}

impl ProductService {
    pub fn new(config: &AppConfig, events: ProductEvents) -> AppResult<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            status_field: config.status_field,
            events,
        })
    }

    fn item_url(&self, id: &str) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("products URL cannot be a base")))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_products(&self, query: &ListQuery) -> AppResult<Vec<Product>> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("limit", query.page_size.to_string()),
            ("sortBy", query.sort_by.as_param().to_string()),
            ("order", query.sort_order.as_param().to_string()),
        ];
        if let Some(status) = query.status.as_status() {
            params.push((
                self.status_field.key(),
                self.status_field.query_value(status).to_string(),
            ));
        }

        let response = self
            .http
            .get(self.base_url.clone())
            .query(&params)
            .send()
            .await?;
        let records = match collection_body(response).await? {
            Some(records) => records,
            None => return Ok(Vec::new()),
        };

        let fetched = records.len();
        let items: Vec<Product> = records
            .into_iter()
            .map(RemoteProduct::into_product)
            .filter(|product| query.status.matches(product))
            .collect();
        if items.len() < fetched {
            tracing::debug!(
                dropped = fetched - items.len(),
                "remote returned records outside the status filter"
            );
        }
        Ok(items)
    }

    pub async fn list_all_products(&self) -> AppResult<Vec<Product>> {
        let response = self.http.get(self.base_url.clone()).send().await?;
        let records = collection_body(response).await?.unwrap_or_default();
        Ok(records.into_iter().map(RemoteProduct::into_product).collect())
    }

    pub async fn get_product(&self, id: &str) -> AppResult<Product> {
        if id.trim().is_empty() {
            return Err(AppError::NotFound);
        }
        let response = self.http.get(self.item_url(id)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::from_remote_status(status, true));
        }
        let record: RemoteProduct = response.json().await?;
        Ok(record.into_product())
    }

    pub async fn create_product(&self, payload: CreateProductRequest) -> AppResult<Product> {
        let name = validate_name(&payload.name)?;
        let now = serde_json::to_value(Utc::now()).map_err(anyhow::Error::from)?;

        let mut body = Map::new();
        body.insert("name".into(), Value::String(name));
        body.insert("description".into(), Value::String(payload.description));
        body.insert(
            self.status_field.key().into(),
            self.status_field.body_value(ProductStatus::Unchecked),
        );
        body.insert("createdAt".into(), now.clone());
        body.insert("updatedAt".into(), now);

        let response = self
            .http
            .post(self.base_url.clone())
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "create product rejected by remote");
            return Err(AppError::from_remote_status(status, false));
        }
        let product = response.json::<RemoteProduct>().await?.into_product();

        tracing::info!(product_id = %product.id, "product created");
        self.events.publish(ProductEvent::Created {
            id: product.id.clone(),
        });
        Ok(product)
    }

    pub async fn update_product_status(
        &self,
        id: &str,
        new_status: ProductStatus,
    ) -> AppResult<Product> {
        let mut body = Map::new();
        body.insert(
            self.status_field.key().into(),
            self.status_field.body_value(new_status),
        );
        self.put(id, body).await.inspect(|product| {
            tracing::info!(product_id = %product.id, status = %product.status, "product status updated");
            self.events.publish(ProductEvent::StatusUpdated {
                id: product.id.clone(),
            });
        })
    }

    pub async fn toggle_product_status(&self, id: &str) -> AppResult<Product> {
        let current = self.get_product(id).await?;
        self.update_product_status(id, current.status.toggled())
            .await
    }

    pub async fn update_product(
        &self,
        id: &str,
        payload: UpdateProductRequest,
    ) -> AppResult<Product> {
        let name = validate_name(&payload.name)?;

        let mut body = Map::new();
        body.insert("name".into(), Value::String(name));
        body.insert("description".into(), Value::String(payload.description));
        body.insert(
            self.status_field.key().into(),
            self.status_field.body_value(payload.status),
        );
        self.put(id, body).await.inspect(|product| {
            tracing::info!(product_id = %product.id, "product updated");
            self.events.publish(ProductEvent::Updated {
                id: product.id.clone(),
            });
        })
    }

    pub async fn delete_product(&self, id: &str) -> AppResult<()> {
        if id.trim().is_empty() {
            return Err(AppError::NotFound);
        }
        let response = self.http.delete(self.item_url(id)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(product_id = %id, status = %status, "delete product rejected by remote");
            return Err(AppError::from_remote_status(status, true));
        }

        tracing::info!(product_id = %id, "product deleted");
        self.events.publish(ProductEvent::Deleted { id: id.to_string() });
        Ok(())
    }

    /// Partial update: sends `body` plus a fresh `updatedAt`.
    async fn put(&self, id: &str, mut body: Map<String, Value>) -> AppResult<Product> {
        if id.trim().is_empty() {
            return Err(AppError::NotFound);
        }
        let now = serde_json::to_value(Utc::now()).map_err(anyhow::Error::from)?;
        body.insert("updatedAt".into(), now);

        let response = self.http.put(self.item_url(id)?).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(product_id = %id, status = %status, "update rejected by remote");
            return Err(AppError::from_remote_status(status, true));
        }
        Ok(response.json::<RemoteProduct>().await?.into_product())
    }
}

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("product name is required".into()));
    }
    Ok(name.to_string())
}

/// Decodes a collection response. The remote answers 404 when nothing
/// matches the query, which is reported as `None` rather than an error.
async fn collection_body(response: reqwest::Response) -> AppResult<Option<Vec<RemoteProduct>>> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        tracing::debug!("remote reported no matching products");
        return Ok(None);
    }
    if !status.is_success() {
        tracing::warn!(status = %status, "list products rejected by remote");
        return Err(AppError::from_remote_status(status, false));
    }
    Ok(Some(response.json().await?))
}
