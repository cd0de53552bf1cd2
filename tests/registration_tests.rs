mod common;

use sea_orm::DatabaseConnection;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{seed_master_data, seed_vendor_config, setup_test_db};
use vschallan_backend::errors::IntegrationError;
use vschallan_backend::repo::retailers as repo;
use vschallan_backend::services::authority::AuthorityClient;
use vschallan_backend::services::registration;
use vschallan_backend::services::token::TokenManager;

fn new_retailer(circle_id: &str) -> repo::NewRetailer {
    repo::NewRetailer {
        business_name: "Dhanmondi Sweets".to_string(),
        owner_name: "A. Rahman".to_string(),
        nid_number: "1987123456789".to_string(),
        bin_number: Some("000123456-0101".to_string()),
        phone: "+8801700000000".to_string(),
        email: Some("owner@example.com".to_string()),
        address: "House 7, Road 2, Dhanmondi".to_string(),
        zone_id: "Z-01".to_string(),
        division_id: "D-02".to_string(),
        circle_id: circle_id.to_string(),
        commission_rate_id: "CR-1".to_string(),
        service_types: vec!["ST-RESTAURANT".to_string()],
    }
}

async fn insert_retailer(db: &DatabaseConnection, circle_id: &str) -> i32 {
    repo::insert_retailer(db, new_retailer(circle_id))
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn successful_registration_stores_remote_number() {
    let server = MockServer::start().await;
    let db = setup_test_db().await;
    seed_vendor_config(&db, &server.uri()).await;
    seed_master_data(&db).await;

    Mock::given(method("POST"))
        .and(path("/integration/retailer_registration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "retailer registered",
            "retailer_number": "R-100"
        })))
        .mount(&server)
        .await;

    let authority = AuthorityClient::new();
    let tokens = TokenManager::new(db.clone(), authority.clone());
    let retailer_id = insert_retailer(&db, "C-03").await;

    let (updated, outcome) =
        registration::register_retailer(&db, &tokens, &authority, retailer_id)
            .await
            .unwrap();

    assert!(!outcome.already_exists);
    assert_eq!(outcome.remote_id.as_deref(), Some("R-100"));
    assert_eq!(updated.retailer_number.as_deref(), Some("R-100"));
    assert!(updated.last_response.is_some());
}

#[tokio::test]
async fn already_exists_reply_is_stored_as_success() {
    let server = MockServer::start().await;
    let db = setup_test_db().await;
    seed_vendor_config(&db, &server.uri()).await;
    seed_master_data(&db).await;

    Mock::given(method("POST"))
        .and(path("/integration/retailer_registration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Retailer already exists, id=R123",
            "retailer_number": "R123"
        })))
        .mount(&server)
        .await;

    let authority = AuthorityClient::new();
    let tokens = TokenManager::new(db.clone(), authority.clone());
    let retailer_id = insert_retailer(&db, "C-03").await;

    let (updated, outcome) =
        registration::register_retailer(&db, &tokens, &authority, retailer_id)
            .await
            .unwrap();

    assert!(outcome.already_exists);
    assert_eq!(updated.retailer_number.as_deref(), Some("R123"));
    assert_eq!(
        updated.registration_message.as_deref(),
        Some("Retailer already exists, id=R123")
    );
}

#[tokio::test]
async fn inconsistent_jurisdiction_never_reaches_the_authority() {
    let server = MockServer::start().await;
    let db = setup_test_db().await;
    seed_vendor_config(&db, &server.uri()).await;
    seed_master_data(&db).await;

    // No mock mounted: any request to the authority would 404 and the
    // test would fail on an unexpected error variant.
    let authority = AuthorityClient::new();
    let tokens = TokenManager::new(db.clone(), authority.clone());

    // C-404 is not a synced circle
    let retailer_id = insert_retailer(&db, "C-404").await;
    let result = registration::register_retailer(&db, &tokens, &authority, retailer_id).await;
    assert!(matches!(result, Err(IntegrationError::Validation(_))));
}

#[tokio::test]
async fn remote_rejection_is_surfaced_verbatim_and_recorded() {
    let server = MockServer::start().await;
    let db = setup_test_db().await;
    seed_vendor_config(&db, &server.uri()).await;
    seed_master_data(&db).await;

    Mock::given(method("POST"))
        .and(path("/integration/retailer_registration"))
        .respond_with(ResponseTemplate::new(422).set_body_string("nid_number is invalid"))
        .mount(&server)
        .await;

    let authority = AuthorityClient::new();
    let tokens = TokenManager::new(db.clone(), authority.clone());
    let retailer_id = insert_retailer(&db, "C-03").await;

    let result = registration::register_retailer(&db, &tokens, &authority, retailer_id).await;
    match result {
        Err(IntegrationError::RemoteValidation(msg)) => {
            assert!(msg.contains("nid_number is invalid"));
        }
        other => panic!("expected RemoteValidation, got {:?}", other.map(|_| ())),
    }

    let stored = repo::find_retailer(&db, retailer_id).await.unwrap().unwrap();
    assert!(stored.last_response.unwrap().contains("nid_number is invalid"));
    assert!(stored.retailer_number.is_none());
}

#[tokio::test]
async fn branch_registration_requires_registered_parent() {
    let server = MockServer::start().await;
    let db = setup_test_db().await;
    seed_vendor_config(&db, &server.uri()).await;
    seed_master_data(&db).await;

    let authority = AuthorityClient::new();
    let tokens = TokenManager::new(db.clone(), authority.clone());
    let retailer_id = insert_retailer(&db, "C-03").await;

    let branch = repo::insert_branch(
        &db,
        repo::NewBranch {
            retailer_id,
            branch_name: "Mirpur Outlet".to_string(),
            address: "Mirpur 10".to_string(),
            phone: None,
        },
    )
    .await
    .unwrap();

    // Parent has no retailer_number yet
    let result = registration::register_branch(&db, &tokens, &authority, branch.id).await;
    assert!(matches!(result, Err(IntegrationError::Validation(_))));
}

#[tokio::test]
async fn branch_registers_under_parent_retailer_number() {
    let server = MockServer::start().await;
    let db = setup_test_db().await;
    seed_vendor_config(&db, &server.uri()).await;
    seed_master_data(&db).await;

    Mock::given(method("POST"))
        .and(path("/integration/retailer_registration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "retailer registered",
            "retailer_number": "R-100"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/integration/retailer_branch_registration"))
        .and(wiremock::matchers::body_string_contains("R-100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "branch registered",
            "retailer_number": "R-100-B1"
        })))
        .mount(&server)
        .await;

    let authority = AuthorityClient::new();
    let tokens = TokenManager::new(db.clone(), authority.clone());

    let retailer_id = insert_retailer(&db, "C-03").await;
    registration::register_retailer(&db, &tokens, &authority, retailer_id)
        .await
        .unwrap();

    let branch = repo::insert_branch(
        &db,
        repo::NewBranch {
            retailer_id,
            branch_name: "Mirpur Outlet".to_string(),
            address: "Mirpur 10".to_string(),
            phone: Some("+8801811111111".to_string()),
        },
    )
    .await
    .unwrap();

    let (updated, outcome) =
        registration::register_branch(&db, &tokens, &authority, branch.id)
            .await
            .unwrap();

    assert_eq!(outcome.remote_id.as_deref(), Some("R-100-B1"));
    assert_eq!(updated.branch_number.as_deref(), Some("R-100-B1"));
}

#[tokio::test]
async fn document_upload_requires_registration_first() {
    let server = MockServer::start().await;
    let db = setup_test_db().await;
    seed_vendor_config(&db, &server.uri()).await;
    seed_master_data(&db).await;

    let authority = AuthorityClient::new();
    let tokens = TokenManager::new(db.clone(), authority.clone());
    let retailer_id = insert_retailer(&db, "C-03").await;

    let result = registration::upload_file(
        &db,
        &tokens,
        &authority,
        retailer_id,
        "/tmp/nid.jpg",
        "nid",
    )
    .await;

    match result {
        Err(IntegrationError::Validation(msg)) => {
            assert!(msg.contains("no remote retailer number"));
        }
        other => panic!("expected Validation, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn document_upload_stores_remote_file_url() {
    let server = MockServer::start().await;
    let db = setup_test_db().await;
    seed_vendor_config(&db, &server.uri()).await;
    seed_master_data(&db).await;

    Mock::given(method("POST"))
        .and(path("/integration/retailer_registration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "retailer registered",
            "retailer_number": "R-100"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/integration/retailer_document_upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "file_url": "https://vat.example.gov/files/nid-r100.jpg"
        })))
        .mount(&server)
        .await;

    let authority = AuthorityClient::new();
    let tokens = TokenManager::new(db.clone(), authority.clone());

    let retailer_id = insert_retailer(&db, "C-03").await;
    registration::register_retailer(&db, &tokens, &authority, retailer_id)
        .await
        .unwrap();

    let file = std::env::temp_dir().join(format!("nid-{}.jpg", std::process::id()));
    tokio::fs::write(&file, b"fake scan").await.unwrap();

    let outcome = registration::upload_file(
        &db,
        &tokens,
        &authority,
        retailer_id,
        file.to_str().unwrap(),
        "nid",
    )
    .await
    .unwrap();

    assert_eq!(
        outcome.file_url.as_deref(),
        Some("https://vat.example.gov/files/nid-r100.jpg")
    );

    let stored = repo::find_retailer(&db, retailer_id).await.unwrap().unwrap();
    assert_eq!(
        stored.nid_document_url.as_deref(),
        Some("https://vat.example.gov/files/nid-r100.jpg")
    );
}
