//! REST client tests against a mock backend
//!
//! Covers:
//! - Envelope decoding for every ledger call
//! - Duplicate invoice rejection at commit time
//! - Server messages, generic fallback and malformed payloads
//! - Auth login / verify / logout

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use shared::{
    EntityId, ExitReason, ExitSubmission, InvoiceSubmission, MovementFilter, MovementKind,
    SessionContext, StockClassification, StockFilter, UserRole,
};
use std::str::FromStr;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bdc_console::error::GENERIC_FAILURE;
use bdc_console::external::{
    ApiClient, AuthClient, Credentials, DirectoryApi, DirectoryClient, LedgerApi, LedgerClient,
};
use bdc_console::ConsoleError;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn session() -> SessionContext {
    SessionContext::new(
        EntityId::from(7),
        "Warehouse Clerk".to_string(),
        UserRole::Warehouse,
        "token-abc".to_string(),
        Utc::now(),
    )
}

fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(format!("{}/api/", server.uri()), Duration::from_secs(5)).unwrap()
}

fn invoice_submission() -> InvoiceSubmission {
    serde_json::from_value(json!({
        "invoiceNumber": "F-100",
        "supplierId": "4",
        "invoiceDate": "2026-10-01",
        "totalValue": "6.00",
        "lineItems": [{
            "productId": "1",
            "quantity": "2",
            "purchasePrice": "3.00",
            "returnedQuantity": "0",
            "netQuantity": "2",
            "subtotal": "6.00"
        }]
    }))
    .unwrap()
}

#[tokio::test]
async fn test_invoice_exists_sends_bearer_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/inventory/invoices/exists"))
        .and(query_param("invoiceNumber", "F-100"))
        .and(header("authorization", "Bearer token-abc"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "exists": true})))
        .expect(1)
        .mount(&server)
        .await;

    let ledger = LedgerClient::new(api(&server));
    let exists = ledger.invoice_number_exists(&session(), "  F-100 ").await.unwrap();
    assert!(exists);
}

#[tokio::test]
async fn test_submit_invoice_returns_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/inventory/entries"))
        .and(body_partial_json(json!({"invoiceNumber": "F-100", "supplierId": "4"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "invoiceId": 501,
            "total": "6.00"
        })))
        .mount(&server)
        .await;

    let ledger = LedgerClient::new(api(&server));
    let receipt = ledger.submit_invoice(&session(), &invoice_submission()).await.unwrap();
    assert_eq!(receipt.invoice_id, EntityId::from(501));
    assert_eq!(receipt.total, dec("6.00"));
}

#[tokio::test]
async fn test_submit_invoice_duplicate_at_commit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/inventory/entries"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "error": "Invoice number already exists"
        })))
        .mount(&server)
        .await;

    let ledger = LedgerClient::new(api(&server));
    let err = ledger
        .submit_invoice(&session(), &invoice_submission())
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::DuplicateInvoice(ref n) if n == "F-100"));
}

#[tokio::test]
async fn test_server_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/inventory/exits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Insufficient stock for Cola 2L"
        })))
        .mount(&server)
        .await;

    let submission = ExitSubmission {
        line_items: vec![shared::ExitLinePayload {
            product_id: EntityId::from(1),
            quantity: dec("2"),
            reason: ExitReason::Damaged,
            notes: None,
        }],
    };

    let ledger = LedgerClient::new(api(&server));
    let err = ledger.submit_exit(&session(), &submission).await.unwrap_err();
    assert_eq!(err.user_message(), "Insufficient stock for Cola 2L");
    assert_eq!(err.code(), "SERVER_ERROR");
}

#[tokio::test]
async fn test_missing_message_falls_back_to_generic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/inventory/stock"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let ledger = LedgerClient::new(api(&server));
    let err = ledger
        .query_stock(&session(), &StockFilter::default())
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), GENERIC_FAILURE);
}

#[tokio::test]
async fn test_malformed_stock_payload_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/inventory/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "products": [{"productId": 1, "name": "Cola 2L", "onHand": "lots"}]
        })))
        .mount(&server)
        .await;

    let ledger = LedgerClient::new(api(&server));
    let err = ledger
        .query_stock(&session(), &StockFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::Decode(_)));
}

#[tokio::test]
async fn test_stock_query_and_local_classification() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/inventory/stock"))
        .and(query_param("stateFilter", "alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "products": [
                {"productId": 1, "name": "Cola 2L", "onHand": "3", "salePrice": "2.00"},
                {"productId": 2, "name": "Juice 1L", "onHand": 0, "salePrice": "9.99"}
            ]
        })))
        .mount(&server)
        .await;

    let ledger = LedgerClient::new(api(&server));
    let products = ledger
        .query_stock(&session(), &StockFilter::alerts())
        .await
        .unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].classification(), StockClassification::Low);
    assert_eq!(products[0].inventory_value(), dec("6.00"));
    assert_eq!(products[1].classification(), StockClassification::Depleted);
    assert_eq!(products[1].inventory_value(), Decimal::ZERO);
}

#[tokio::test]
async fn test_movement_history_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/inventory/movements"))
        .and(query_param("kind", "exit"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "movements": [{
                "id": 9,
                "kind": "exit",
                "productId": 1,
                "productName": "Cola 2L",
                "quantity": "2",
                "total": "4.00",
                "reference": "damaged",
                "occurredAt": "2026-10-02 14:30:00"
            }],
            "stats": {"totalEntries": 4, "totalExits": 1, "entryValue": "120.00", "exitValue": "4.00"},
            "pagination": {"page": 2, "perPage": 20, "totalItems": 21, "totalPages": 2}
        })))
        .mount(&server)
        .await;

    let filter = MovementFilter {
        kind: Some(MovementKind::Exit),
        page: 2,
        ..MovementFilter::default()
    };

    let ledger = LedgerClient::new(api(&server));
    let page = ledger.query_movements(&session(), &filter).await.unwrap();
    assert_eq!(page.movements.len(), 1);
    assert_eq!(page.movements[0].kind, MovementKind::Exit);
    assert_eq!(page.stats.net_value(), dec("116.00"));
    assert!(!page.pagination.has_next());
}

#[tokio::test]
async fn test_unauthorized_maps_to_session_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/suppliers"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Token expired"
        })))
        .mount(&server)
        .await;

    let directory = DirectoryClient::new(api(&server));
    let err = directory.list_suppliers(&session()).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Unauthorized));
}

#[tokio::test]
async fn test_product_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("search", "cola"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "products": [{"id": 1, "code": "BEV-001", "name": "Cola 2L", "purchasePrice": "1.50"}]
        })))
        .mount(&server)
        .await;

    let directory = DirectoryClient::new(api(&server));
    let products = directory.list_products(&session(), Some(" cola ")).await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].purchase_price, Some(dec("1.50")));
}

#[tokio::test]
async fn test_login_refresh_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({"username": "clerk"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "token-1",
            "user": {"id": 7, "name": "Warehouse Clerk", "role": "warehouse"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user": {"id": 7, "name": "Warehouse Clerk", "role": "warehouse"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let auth = AuthClient::new(api(&server));
    let session = auth
        .login(&Credentials::new("clerk", "secret"))
        .await
        .unwrap();
    assert_eq!(session.token(), "token-1");
    assert_eq!(session.role(), &UserRole::Warehouse);

    let refreshed = auth.refresh(&session).await.unwrap();
    assert_eq!(refreshed.token(), "token-1");
    assert_eq!(refreshed.user_id(), session.user_id());

    auth.logout(refreshed).await.unwrap();
}

#[tokio::test]
async fn test_login_requires_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let auth = AuthClient::new(api(&server));
    let err = auth.login(&Credentials::new("", "")).await.unwrap_err();
    assert!(matches!(err, ConsoleError::InvalidCredentials(_)));
}
