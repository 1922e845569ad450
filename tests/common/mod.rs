//! In-process stand-in for the remote products API.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Duration, Utc};
use product_tracker::{config::AppConfig, models::StatusField};
use serde_json::{Value, json};
use url::Url;
use uuid::Uuid;

#[derive(Default)]
pub struct MockState {
    records: Mutex<Vec<Value>>,
    requests: AtomicUsize,
    /// Behave like a remote that silently ignores filter parameters.
    pub ignore_filters: AtomicBool,
    /// Answer every request with a 500.
    pub fail_all: AtomicBool,
}

impl MockState {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<Value> {
        self.records.lock().unwrap().clone()
    }
}

pub struct MockRemote {
    pub url: Url,
    pub state: Arc<MockState>,
    pub status_field: StatusField,
}

impl MockRemote {
    pub async fn start(status_field: StatusField) -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/api/v1/products", get(list).post(create))
            .route(
                "/api/v1/products/{id}",
                get(fetch).put(update).delete(remove),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: Url::parse(&format!("http://{addr}/api/v1/products")).unwrap(),
            state,
            status_field,
        }
    }

    pub fn config(&self) -> AppConfig {
        AppConfig::for_remote(self.url.clone(), self.status_field)
    }

    /// Inserts a record directly, bypassing the request counter.
    pub fn seed(&self, name: &str, checked: bool, created_at: DateTime<Utc>) -> String {
        let id = Uuid::new_v4().to_string();
        let mut record = json!({
            "id": id,
            "name": name,
            "description": format!("{name} description"),
            "createdAt": created_at,
            "updatedAt": created_at,
        });
        match self.status_field {
            StatusField::Checked => record["checked"] = json!(checked),
            StatusField::Status => {
                record["status"] = json!(if checked { "checked" } else { "unchecked" })
            }
        }
        self.state.records.lock().unwrap().push(record);
        id
    }

    /// Seeds `count` records alternating checked and unchecked, oldest first.
    pub fn seed_many(&self, count: usize) -> Vec<String> {
        let start = Utc::now() - Duration::hours(count as i64);
        (0..count)
            .map(|i| {
                self.seed(
                    &format!("Product {i:02}"),
                    i % 2 == 0,
                    start + Duration::minutes(i as i64),
                )
            })
            .collect()
    }
}

fn guard(state: &MockState) -> Option<Response> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if state.fail_all.load(Ordering::SeqCst) {
        return Some((StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response());
    }
    None
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!("Not found"))).into_response()
}

fn field_as_param(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::Bool(b) => Some(b.to_string()),
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

async fn list(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(resp) = guard(&state) {
        return resp;
    }
    let mut records = state.records();

    if !state.ignore_filters.load(Ordering::SeqCst) {
        for key in ["checked", "status"] {
            if let Some(wanted) = params.get(key) {
                records.retain(|r| field_as_param(r, key).as_deref() == Some(wanted.as_str()));
            }
        }
    }

    if let Some(sort_by) = params.get("sortBy") {
        records.sort_by_key(|r| field_as_param(r, sort_by).unwrap_or_default());
        if params.get("order").map(String::as_str) == Some("desc") {
            records.reverse();
        }
    }

    if let (Some(page), Some(limit)) = (
        params.get("page").and_then(|p| p.parse::<usize>().ok()),
        params.get("limit").and_then(|l| l.parse::<usize>().ok()),
    ) {
        records = records
            .into_iter()
            .skip(page.saturating_sub(1) * limit)
            .take(limit)
            .collect();
    }

    if records.is_empty() && !params.is_empty() {
        return not_found();
    }
    Json(records).into_response()
}

async fn fetch(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    if let Some(resp) = guard(&state) {
        return resp;
    }
    let records = state.records.lock().unwrap();
    match records.iter().find(|r| r["id"] == json!(id)) {
        Some(record) => Json(record.clone()).into_response(),
        None => not_found(),
    }
}

async fn create(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if let Some(resp) = guard(&state) {
        return resp;
    }
    let mut record = body;
    record["id"] = json!(Uuid::new_v4().to_string());
    state.records.lock().unwrap().push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(resp) = guard(&state) {
        return resp;
    }
    let mut records = state.records.lock().unwrap();
    let Some(record) = records.iter_mut().find(|r| r["id"] == json!(id)) else {
        return not_found();
    };
    if let (Some(target), Value::Object(changes)) = (record.as_object_mut(), body) {
        for (key, value) in changes {
            target.insert(key, value);
        }
    }
    Json(record.clone()).into_response()
}

async fn remove(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    if let Some(resp) = guard(&state) {
        return resp;
    }
    let mut records = state.records.lock().unwrap();
    match records.iter().position(|r| r["id"] == json!(id)) {
        Some(index) => Json(records.remove(index)).into_response(),
        None => not_found(),
    }
}
