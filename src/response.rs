use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub has_more: Option<bool>,
}

impl Meta {
    pub fn new(page: u32, page_size: u32, has_more: bool) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            has_more: Some(has_more),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            page_size: None,
            has_more: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
