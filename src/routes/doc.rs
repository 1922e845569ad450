use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest, UpdateStatusRequest},
    models::{Product, ProductStatus},
    response::{ApiResponse, Meta},
    routes::{feed, health, params, products},
    services::list_state::ListView,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::list_all_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::update_product_status,
        products::toggle_product_status,
        products::delete_product,
        feed::load_first_page,
        feed::load_next_page,
        feed::feed_state
    ),
    components(
        schemas(
            Product,
            ProductStatus,
            ProductList,
            CreateProductRequest,
            UpdateProductRequest,
            UpdateStatusRequest,
            ListView,
            params::ListQuery,
            params::ProductQuery,
            params::StatusFilter,
            params::SortBy,
            params::SortOrder,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<ListView>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product endpoints backed by the remote products API"),
        (name = "Feed", description = "Paginated list view, refreshed on product changes"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
