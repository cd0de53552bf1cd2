mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{seed_master_data, seed_vendor_config, setup_test_db};
use vschallan_backend::{app, AppState};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn pos_txn_body(order_id: &str) -> Value {
    json!({
        "order_id": order_id,
        "customer_id": "CUST-001",
        "retailer_number": "R-100",
        "branch": "Main",
        "service_type_code": "ST-RESTAURANT",
        "zone_id": "Z-01",
        "division_id": "D-02",
        "circle_id": "C-03",
        "txn_amount": "1200",
        "total_discount_amount": "50",
        "total_service_charges_amount": "30",
        "payment_method": "Cash"
    })
}

#[tokio::test]
async fn health_endpoint_answers() {
    let db = setup_test_db().await;
    let router = app(AppState::new(db));

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_invoice_endpoint_returns_pending_invoice() {
    let server = MockServer::start().await;
    let db = setup_test_db().await;
    seed_vendor_config(&db, &server.uri()).await;
    seed_master_data(&db).await;

    let router = app(AppState::new(db));
    let response = router
        .oneshot(post_json("/api/invoices", pos_txn_body("ORD-001")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "Pending");
    assert_eq!(body["order_id"], "ORD-001");
    // Decimal serializes as a string; compare numerically
    let sd: rust_decimal::Decimal = body["total_sd_amount"].as_str().unwrap().parse().unwrap();
    assert_eq!(sd, rust_decimal_macros::dec!(60));
}

#[tokio::test]
async fn create_invoice_without_rate_coverage_is_unprocessable() {
    let server = MockServer::start().await;
    let db = setup_test_db().await;
    seed_vendor_config(&db, &server.uri()).await;
    // No master data seeded: rate resolution must fail loudly

    let router = app(AppState::new(db));
    let response = router
        .oneshot(post_json("/api/invoices", pos_txn_body("ORD-001")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("no commission rate"));
}

#[tokio::test]
async fn sync_now_endpoint_moves_invoice_to_synced() {
    let server = MockServer::start().await;
    let db = setup_test_db().await;
    seed_vendor_config(&db, &server.uri()).await;
    seed_master_data(&db).await;

    Mock::given(method("POST"))
        .and(path("/integration/challan_submission"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "challan issued",
            "challan_id": "CH-9001"
        })))
        .mount(&server)
        .await;

    let state = AppState::new(db);
    let router = app(state);

    let created = router
        .clone()
        .oneshot(post_json("/api/invoices", pos_txn_body("ORD-001")))
        .await
        .unwrap();
    let created = body_json(created).await;
    let id = created["id"].as_i64().unwrap();

    let response = router
        .oneshot(post_json(&format!("/api/invoices/{}/sync", id), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "Synced");
    assert_eq!(body["challan_id"], "CH-9001");
}

#[tokio::test]
async fn invoice_report_filters_by_status_and_summarizes() {
    let server = MockServer::start().await;
    let db = setup_test_db().await;
    seed_vendor_config(&db, &server.uri()).await;
    seed_master_data(&db).await;

    let router = app(AppState::new(db));

    for order_id in ["ORD-001", "ORD-002"] {
        let response = router
            .clone()
            .oneshot(post_json("/api/invoices", pos_txn_body(order_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/reports/invoices?status=Pending")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["rows"].as_array().unwrap().len(), 2);
    assert_eq!(body["summary"]["total_invoices"], 2);
    assert_eq!(body["summary"]["pending"], 2);
    assert_eq!(body["summary"]["synced"], 0);

    // Nothing is Synced yet
    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/reports/invoices?status=Synced")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["rows"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn service_type_sales_report_returns_chart_series() {
    let server = MockServer::start().await;
    let db = setup_test_db().await;
    seed_vendor_config(&db, &server.uri()).await;
    seed_master_data(&db).await;

    let router = app(AppState::new(db));
    let response = router
        .clone()
        .oneshot(post_json("/api/invoices", pos_txn_body("ORD-001")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/reports/service-type-sales")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["chart"]["labels"][0], "ST-RESTAURANT");
    assert_eq!(body["rows"][0]["invoice_count"], 1);
}

#[tokio::test]
async fn missing_vendor_configuration_surfaces_as_config_error() {
    let db = setup_test_db().await;
    let router = app(AppState::new(db));

    let response = router
        .oneshot(post_json("/api/sync/zones", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("no POS vendor configuration"));
}
