use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use notification_cell::models::{NotificationCategory, NotificationKind, PatientSnapshot};
use notification_cell::router::notification_routes;
use notification_cell::services::store::NotificationStore;

async fn seeded_store() -> NotificationStore {
    let store = NotificationStore::new();
    store
        .record(
            "Slot confirmed for Ana Silva.",
            NotificationKind::Success,
            Some(PatientSnapshot {
                name: "Ana Silva".to_string(),
                nif: Some("254888999".to_string()),
                email: None,
                phone: Some("912345678".to_string()),
            }),
            NotificationCategory::Appointment,
        )
        .await;
    store
        .record(
            "Slot unavailable for Dr. Ricardo M.",
            NotificationKind::Warning,
            None,
            NotificationCategory::Appointment,
        )
        .await;
    store
}

async fn get_json(app: axum::Router, uri: &str) -> Value {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn feed_returns_newest_first_with_unread_count() {
    let store = seeded_store().await;
    let body = get_json(notification_routes(store), "/feed").await;

    assert_eq!(body["unread"], 2);
    let feed = body["notifications"].as_array().unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0]["kind"], "warning");
    assert_eq!(feed[1]["patient"]["nif"], "254888999");
}

#[tokio::test]
async fn audit_feed_supports_search_and_kind_filters() {
    let store = seeded_store().await;

    let body = get_json(notification_routes(store.clone()), "/audit?search=ana").await;
    assert_eq!(body["total"], 1);

    let body = get_json(notification_routes(store), "/audit?kind=warning").await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["entries"][0]["kind"], "warning");
}

#[tokio::test]
async fn bell_dismissal_removes_the_entry_from_the_feed() {
    let store = seeded_store().await;
    let id = store.bell_feed().await[0].id;

    let response = notification_routes(store.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/{id}/dismiss"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = get_json(notification_routes(store), "/feed").await;
    assert_eq!(body["notifications"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn read_all_resets_the_unread_count() {
    let store = seeded_store().await;

    let response = notification_routes(store.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/read-all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = get_json(notification_routes(store), "/unread-count").await;
    assert_eq!(body["unread"], 0);
}
