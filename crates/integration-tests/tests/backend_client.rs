//! Backend client against the stub and an unreachable server.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use tokio::net::TcpListener;

use clinica_backend::appointments::AppointmentQuery;
use clinica_backend::products::ProductQuery;
use clinica_backend::{BackendClient, BackendConfig, ErrorCategory, RequestContext};
use clinica_core::ProductId;
use clinica_integration_tests::StubBackend;

fn client(url: &str) -> BackendClient {
    let vars = HashMap::from([("API_URL", url.to_string()), ("API_TIMEOUT_SECS", "2".to_string())]);
    let config = BackendConfig::from_lookup(&|key| vars.get(key).cloned()).unwrap();
    BackendClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_paginated_and_bare_listings() {
    let stub = StubBackend::start().await;
    let client = client(stub.url());
    let ctx = RequestContext::anonymous();

    let products = client
        .list_products(&ctx, &ProductQuery::default())
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(products.total, 4);
    assert_eq!(products.data[0].id, ProductId::new("p1"));

    let appointments = client
        .list_appointments(&ctx, &AppointmentQuery::default())
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(appointments.total, 2);
    assert_eq!(appointments.page, 1);
}

#[tokio::test]
async fn test_missing_product_is_a_validation_error() {
    let stub = StubBackend::start().await;
    let client = client(stub.url());

    let err = client
        .get_product(&RequestContext::anonymous(), &ProductId::new("ghost"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(err.user_message(), "Product not found");
}

#[tokio::test]
async fn test_query_parameters_reach_backend() {
    let stub = StubBackend::start().await;
    let client = client(stub.url());

    let query = ProductQuery {
        category: Some("sun".to_string()),
        limit: Some(5),
        ..ProductQuery::default()
    };
    client
        .list_products(&RequestContext::anonymous(), &query)
        .await
        .unwrap();

    let recorded = stub.requests_to("/products");
    let sent = recorded[0].query.as_deref().unwrap();
    assert!(sent.contains("category=sun"));
    assert!(sent.contains("limit=5"));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(&format!("http://{addr}/"));
    let err = client.ping().await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Network);
    assert_eq!(err.user_message(), ErrorCategory::Network.user_message());
}
