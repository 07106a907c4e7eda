mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use storefront_api::{
    routes::create_api_router,
    services::mailer::{Mailer, ResendMailer},
};
use tower::ServiceExt;
use uuid::Uuid;

use common::{OWNER_EMAIL, RecordingMailer, bearer_for, offline_state, test_config};

fn app(mailer: Arc<dyn Mailer>) -> Router {
    Router::new()
        .nest("/api", create_api_router())
        .with_state(offline_state(mailer))
}

async fn post(app: Router, path: &str, auth: Option<String>, body: Value) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        request = request.header(header::AUTHORIZATION, auth);
    }
    let response = app
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn customer() -> Option<String> {
    Some(bearer_for(Uuid::new_v4(), "ama@example.com"))
}

#[tokio::test]
async fn validate_order_requires_token() {
    let body = json!({ "items": [{ "id": 1, "quantity": 1 }], "total_amount": 240.0 });

    let (status, _) = post(
        app(Arc::new(RecordingMailer::default())),
        "/api/functions/validate-order",
        None,
        body.clone(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post(
        app(Arc::new(RecordingMailer::default())),
        "/api/functions/validate-order",
        Some("Bearer not-a-jwt".into()),
        body,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn validate_order_accepts_matching_total() {
    let (status, body) = post(
        app(Arc::new(RecordingMailer::default())),
        "/api/functions/validate-order",
        customer(),
        json!({ "items": [{ "id": 1, "quantity": 2 }], "total_amount": 480.0 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], json!(true));
    assert_eq!(body["calculated_total"].as_f64(), Some(480.0));
}

#[tokio::test]
async fn validate_order_rejects_tampered_total() {
    let (status, body) = post(
        app(Arc::new(RecordingMailer::default())),
        "/api/functions/validate-order",
        customer(),
        json!({ "items": [{ "id": 1, "quantity": 2 }], "total_amount": 470.0 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Price validation failed"));
    assert_eq!(body["calculated_total"].as_f64(), Some(480.0));
    assert_eq!(body["submitted_total"].as_f64(), Some(470.0));
}

#[tokio::test]
async fn validate_order_rejects_unknown_product() {
    let (status, body) = post(
        app(Arc::new(RecordingMailer::default())),
        "/api/functions/validate-order",
        customer(),
        json!({ "items": [{ "id": 999, "quantity": 1 }], "total_amount": 10.0 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid product ID: 999"));
    assert!(body.get("calculated_total").is_none());
}

#[tokio::test]
async fn validate_order_rejects_bad_quantity() {
    let (status, body) = post(
        app(Arc::new(RecordingMailer::default())),
        "/api/functions/validate-order",
        customer(),
        json!({ "items": [{ "id": 2, "quantity": 0 }], "total_amount": 0.0 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid quantity for product 2"));
}

fn notification_body() -> Value {
    json!({
        "full_name": "<script>alert(1)</script>",
        "email": "ama@example.com",
        "phone_number": "+233 597 868 871",
        "delivery_address": "12 Ring Road, East Legon",
        "items": [{ "id": 1, "name": "Fringe Buubu Dress", "price": 240.0, "quantity": 2 }],
        "total_amount": 480.0
    })
}

#[tokio::test]
async fn notification_emails_owner_and_customer_with_escaped_text() {
    let mailer = Arc::new(RecordingMailer::default());

    let (status, body) = post(
        app(mailer.clone()),
        "/api/functions/send-order-notification",
        customer(),
        notification_body(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["ownerEmail"]["id"], json!("msg_1"));
    assert_eq!(body["customerEmail"]["id"], json!("msg_2"));

    let sent = mailer.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, vec![OWNER_EMAIL.to_string()]);
    assert_eq!(sent[1].to, vec!["ama@example.com".to_string()]);
    assert_eq!(sent[1].subject, "Order Confirmation");
    for email in &sent {
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("&lt;script&gt;"));
        assert!(email.html.contains("480.00"));
    }
}

#[tokio::test]
async fn notification_failure_is_reported_as_server_error() {
    let mut config = test_config("postgres://unused", None);
    config.mail.resend_api_key = None;
    let mailer: Arc<dyn Mailer> = Arc::new(ResendMailer::new(&config.mail));

    let (status, body) = post(
        app(mailer),
        "/api/functions/send-order-notification",
        customer(),
        notification_body(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("RESEND_API_KEY not configured"));
}

#[tokio::test]
async fn notification_requires_token() {
    let mailer = Arc::new(RecordingMailer::default());
    let (status, _) = post(
        app(mailer.clone()),
        "/api/functions/send-order-notification",
        None,
        notification_body(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn notification_reprices_tampered_items_from_ledger() {
    let mailer = Arc::new(RecordingMailer::default());
    let mut body = notification_body();
    body["items"] = json!([{ "id": 1, "name": "Bargain", "price": 0.01, "quantity": 2 }]);
    body["total_amount"] = json!(0.02);

    let (status, _) = post(
        app(mailer.clone()),
        "/api/functions/send-order-notification",
        customer(),
        body,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let sent = mailer.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 2);
    for email in &sent {
        assert!(email.html.contains("GHS 480.00"));
        assert!(email.html.contains("Fringe Buubu Dress x 2"));
        assert!(!email.html.contains("0.02"));
        assert!(!email.html.contains("Bargain"));
    }
}

#[tokio::test]
async fn notification_ignores_huge_client_price() {
    let mailer = Arc::new(RecordingMailer::default());
    let mut body = notification_body();
    body["items"] = json!([{ "id": 1, "name": "Fringe Buubu Dress", "price": 1e28, "quantity": 100 }]);
    body["total_amount"] = json!(1e28);

    let (status, _) = post(
        app(mailer.clone()),
        "/api/functions/send-order-notification",
        customer(),
        body,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let sent = mailer.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 2);
    assert!(sent[1].html.contains("GHS 24000.00"));
}

#[tokio::test]
async fn notification_rejects_unpriceable_orders() {
    let cases = [
        (json!([{ "id": 1, "name": "x", "price": 240.0, "quantity": 1000 }]), "Invalid quantity for product 1"),
        (json!([{ "id": 999, "name": "x", "price": 1.0, "quantity": 1 }]), "Invalid product ID: 999"),
        (json!([]), "Order has no items"),
    ];

    for (items, expected) in cases {
        let mailer = Arc::new(RecordingMailer::default());
        let mut body = notification_body();
        body["items"] = items;

        let (status, response) = post(
            app(mailer.clone()),
            "/api/functions/send-order-notification",
            customer(),
            body,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], json!(expected));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }
}
