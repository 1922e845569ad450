mod common;

use std::sync::atomic::Ordering;

use common::MockRemote;
use product_tracker::{
    config::AppConfig,
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::AppError,
    events::{ProductEvent, ProductEvents},
    models::{ProductStatus, StatusField},
    routes::params::{ListQuery, SortBy, SortOrder, StatusFilter},
    services::product_service::ProductService,
};
use url::Url;

fn service(remote: &MockRemote) -> (ProductService, ProductEvents) {
    let events = ProductEvents::new();
    let service = ProductService::new(&remote.config(), events.clone()).unwrap();
    (service, events)
}

fn create_request(name: &str) -> CreateProductRequest {
    CreateProductRequest {
        name: name.into(),
        description: "d".into(),
    }
}

#[tokio::test]
async fn status_filter_holds_when_remote_ignores_it() {
    let remote = MockRemote::start(StatusField::Checked).await;
    remote.seed_many(8);
    remote.state.ignore_filters.store(true, Ordering::SeqCst);
    let (service, _) = service(&remote);

    for filter in [StatusFilter::Checked, StatusFilter::Unchecked] {
        let query = ListQuery {
            page_size: 20,
            status: filter,
            ..ListQuery::default()
        };
        let items = service.list_products(&query).await.unwrap();
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|p| filter.matches(p)));
    }
}

#[tokio::test]
async fn list_sends_paging_and_sort_to_remote() {
    let remote = MockRemote::start(StatusField::Checked).await;
    remote.seed_many(5);
    let (service, _) = service(&remote);

    let query = ListQuery {
        page: 2,
        page_size: 2,
        status: StatusFilter::All,
        sort_by: SortBy::Name,
        sort_order: SortOrder::Asc,
    };
    let items = service.list_products(&query).await.unwrap();
    let names: Vec<_> = items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Product 02", "Product 03"]);
}

#[tokio::test]
async fn list_returns_empty_when_remote_reports_no_match() {
    let remote = MockRemote::start(StatusField::Checked).await;
    remote.seed("Only", false, chrono::Utc::now());
    let (service, _) = service(&remote);

    let query = ListQuery {
        status: StatusFilter::Checked,
        ..ListQuery::default()
    };
    let items = service.list_products(&query).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn list_failure_is_raised_not_swallowed() {
    let remote = MockRemote::start(StatusField::Checked).await;
    remote.seed_many(3);
    remote.state.fail_all.store(true, Ordering::SeqCst);
    let (service, _) = service(&remote);

    let err = service.list_products(&ListQuery::default()).await.unwrap_err();
    assert!(matches!(err, AppError::RequestFailed { status: 500 }));
}

#[tokio::test]
async fn transport_failure_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{addr}/products")).unwrap();
    let config = AppConfig::for_remote(url, StatusField::Checked);
    let service = ProductService::new(&config, ProductEvents::new()).unwrap();

    let err = service.list_products(&ListQuery::default()).await.unwrap_err();
    assert!(matches!(err, AppError::Network(_)));
}

#[tokio::test]
async fn create_rejects_blank_name_without_a_request() {
    let remote = MockRemote::start(StatusField::Checked).await;
    let (service, _) = service(&remote);

    for name in ["", "   "] {
        let err = service
            .create_product(create_request(name))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
    assert_eq!(remote.state.requests(), 0);
}

#[tokio::test]
async fn create_returns_unchecked_product_and_notifies() {
    let remote = MockRemote::start(StatusField::Checked).await;
    let (service, events) = service(&remote);
    let mut rx = events.subscribe();

    let product = service.create_product(create_request("Widget")).await.unwrap();
    assert!(!product.id.is_empty());
    assert_eq!(product.name, "Widget");
    assert_eq!(product.description, "d");
    assert_eq!(product.status, ProductStatus::Unchecked);
    assert_eq!(product.created_at, product.updated_at);

    let stored = remote.state.records();
    assert_eq!(stored[0]["checked"], serde_json::json!(false));

    assert_eq!(
        rx.recv().await.unwrap(),
        ProductEvent::Created { id: product.id }
    );
}

#[tokio::test]
async fn status_update_bumps_updated_at() {
    let remote = MockRemote::start(StatusField::Checked).await;
    let (service, events) = service(&remote);

    let created = service.create_product(create_request("Widget")).await.unwrap();
    let mut rx = events.subscribe();
    let updated = service
        .update_product_status(&created.id, ProductStatus::Checked)
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.status, ProductStatus::Checked);
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(
        rx.recv().await.unwrap(),
        ProductEvent::StatusUpdated { id: created.id }
    );
}

#[tokio::test]
async fn status_update_of_missing_product_is_not_found() {
    let remote = MockRemote::start(StatusField::Checked).await;
    let (service, events) = service(&remote);
    let mut rx = events.subscribe();

    let err = service
        .update_product_status("does-not-exist", ProductStatus::Checked)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn toggle_flips_status_both_ways() {
    let remote = MockRemote::start(StatusField::Checked).await;
    let id = remote.seed("Lamp", false, chrono::Utc::now());
    let (service, _) = service(&remote);

    let first = service.toggle_product_status(&id).await.unwrap();
    assert_eq!(first.status, ProductStatus::Checked);
    let second = service.toggle_product_status(&id).await.unwrap();
    assert_eq!(second.status, ProductStatus::Unchecked);
}

#[tokio::test]
async fn full_update_replaces_editable_fields() {
    let remote = MockRemote::start(StatusField::Checked).await;
    let (service, _) = service(&remote);
    let created = service.create_product(create_request("Widget")).await.unwrap();

    let updated = service
        .update_product(
            &created.id,
            UpdateProductRequest {
                name: "Gadget".into(),
                description: "new".into(),
                status: ProductStatus::Checked,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Gadget");
    assert_eq!(updated.description, "new");
    assert_eq!(updated.status, ProductStatus::Checked);

    let err = service
        .update_product(
            &created.id,
            UpdateProductRequest {
                name: " ".into(),
                description: String::new(),
                status: ProductStatus::Unchecked,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn deleted_product_is_gone() {
    let remote = MockRemote::start(StatusField::Checked).await;
    let (service, events) = service(&remote);
    let created = service.create_product(create_request("Widget")).await.unwrap();
    let mut rx = events.subscribe();

    service.delete_product(&created.id).await.unwrap();
    assert_eq!(
        rx.recv().await.unwrap(),
        ProductEvent::Deleted {
            id: created.id.clone()
        }
    );

    let err = service.get_product(&created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    let err = service.delete_product(&created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn string_status_wire_is_supported() {
    let remote = MockRemote::start(StatusField::Status).await;
    remote.seed_many(6);
    let (service, _) = service(&remote);

    let created = service.create_product(create_request("Widget")).await.unwrap();
    let stored = remote.state.records();
    let raw = stored.iter().find(|r| r["id"] == serde_json::json!(created.id)).unwrap();
    assert_eq!(raw["status"], serde_json::json!("unchecked"));
    assert!(raw.get("checked").is_none());

    let query = ListQuery {
        page_size: 20,
        status: StatusFilter::Checked,
        ..ListQuery::default()
    };
    let items = service.list_products(&query).await.unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|p| p.status == ProductStatus::Checked));

    let all = service.list_all_products().await.unwrap();
    assert_eq!(all.len(), 7);
}
