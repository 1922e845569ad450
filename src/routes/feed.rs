use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    error::AppResult,
    response::{ApiResponse, Meta},
    routes::params::ListParams,
    services::list_state::ListView,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(load_first_page))
        .route("/next", post(load_next_page))
        .route("/state", get(feed_state))
}

fn meta_for(view: &ListView) -> Meta {
    let page_size = view.query.as_ref().map(|q| q.page_size).unwrap_or_default();
    Meta::new(view.current_page, page_size, view.has_more)
}

#[utoipa::path(
    get,
    path = "/api/feed",
    params(
        ("status" = Option<String>, Query, description = "all, checked or unchecked; default all"),
        ("checked" = Option<String>, Query, description = "Legacy filter: true, false or all"),
        ("sortBy" = Option<String>, Query, description = "name, createdAt or updatedAt; default updatedAt"),
        ("sortOrder" = Option<String>, Query, description = "asc or desc; default desc"),
        ("pageSize" = Option<u32>, Query, description = "Items per page, default 10"),
    ),
    responses(
        (status = 200, description = "Fresh list view starting at page 1", body = ApiResponse<ListView>),
        (status = 400, description = "Invalid query"),
        (status = 502, description = "Remote products API failed"),
    ),
    tag = "Feed"
)]
pub async fn load_first_page(
    State(state): State<AppState>,
    ListParams(query): ListParams,
) -> AppResult<Json<ApiResponse<ListView>>> {
    let query = query.into_list_query(state.default_page_size)?;
    let view = state.feed.load_first_page(query).await?;
    let meta = meta_for(&view);
    Ok(Json(ApiResponse::success("Products", view, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/feed/next",
    responses(
        (status = 200, description = "List view after loading the next page", body = ApiResponse<ListView>),
        (status = 502, description = "Remote products API failed"),
    ),
    tag = "Feed"
)]
pub async fn load_next_page(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ListView>>> {
    let view = state.feed.load_next_page().await?;
    let meta = meta_for(&view);
    Ok(Json(ApiResponse::success("Products", view, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/feed/state",
    responses(
        (status = 200, description = "Current list view", body = ApiResponse<ListView>),
    ),
    tag = "Feed"
)]
pub async fn feed_state(State(state): State<AppState>) -> Json<ApiResponse<ListView>> {
    let view = state.feed.snapshot();
    let meta = meta_for(&view);
    Json(ApiResponse::success("Products", view, Some(meta)))
}
