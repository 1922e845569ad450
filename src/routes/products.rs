use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest, UpdateStatusRequest},
    error::AppResult,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::ListParams,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/all", get(list_all_products))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/status", put(update_product_status))
        .route("/{id}/toggle", post(toggle_product_status))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("status" = Option<String>, Query, description = "all, checked or unchecked; default all"),
        ("checked" = Option<String>, Query, description = "Legacy filter: true, false or all"),
        ("sortBy" = Option<String>, Query, description = "name, createdAt or updatedAt; default updatedAt"),
        ("sortOrder" = Option<String>, Query, description = "asc or desc; default desc"),
        ("page" = Option<u32>, Query, description = "Page number, default 1"),
        ("pageSize" = Option<u32>, Query, description = "Items per page, default 10"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>),
        (status = 400, description = "Invalid query"),
        (status = 502, description = "Remote products API failed"),
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    ListParams(query): ListParams,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let query = query.into_list_query(state.default_page_size)?;
    let items = state.products.list_products(&query).await?;

    let has_more = items.len() == query.page_size as usize;
    let meta = Meta::new(query.page, query.page_size, has_more);
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/all",
    responses(
        (status = 200, description = "Every product, unpaginated", body = ApiResponse<ProductList>),
        (status = 502, description = "Remote products API failed"),
    ),
    tag = "Products"
)]
pub async fn list_all_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let items = state.products.list_all_products().await?;
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state.products.get_product(&id).await?;
    Ok(Json(ApiResponse::success("Product", product, None)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Product name is required"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = state.products.create_product(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            format!("Product \"{}\" has been added", product.name),
            product,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 400, description = "Product name is required"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state.products.update_product(&id, payload).await?;
    Ok(Json(ApiResponse::success(
        "Updated",
        product,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/status",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Product with its new status", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn update_product_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state
        .products
        .update_product_status(&id, payload.status)
        .await?;
    Ok(Json(ApiResponse::success(
        "Status updated",
        product,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/toggle",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with its flipped status", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn toggle_product_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state.products.toggle_product_status(&id).await?;
    Ok(Json(ApiResponse::success(
        "Status updated",
        product,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    state.products.delete_product(&id).await?;
    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    )))
}
