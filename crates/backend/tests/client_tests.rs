use std::time::Duration;

use stratus_backend::{BackendError, CloudClient, Organisation};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> CloudClient {
    CloudClient::new(server.uri(), Duration::from_secs(5)).expect("client builds")
}

#[tokio::test]
async fn customers_decodes_organisations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers/"))
        .and(header("Authorization", "Token good-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "org1", "uuid": "id1", "projects": [{"name": "p1"}]},
            {"name": "org2", "uuid": "id2", "projects": []}
        ])))
        .mount(&server)
        .await;

    let orgs: Vec<Organisation> = client(&server).customers(Some("good-token")).await.unwrap();
    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[0].name, "org1");
    assert_eq!(orgs[0].projects[0].name, "p1");
}

#[tokio::test]
async fn missing_token_fails_before_any_request() {
    let server = MockServer::start().await;
    // No mock mounted: a request would 404 and fail differently.
    let err = client(&server).customers(None).await.unwrap_err();
    assert!(matches!(err, BackendError::InvalidToken));
}

#[tokio::test]
async fn unauthorized_maps_to_invalid_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({"detail": "Invalid token"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).customers(Some("bad")).await.unwrap_err();
    assert!(matches!(err, BackendError::InvalidToken));
}

#[tokio::test]
async fn api_error_passes_detail_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers/"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({"detail": "System error"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).customers(Some("token")).await.unwrap_err();
    match err {
        BackendError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "System error");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn instances_narrow_by_project_uuid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openstacktenant-instances/"))
        .and(query_param("project_uuid", "p-uuid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "vm1", "customer_name": "org1",
             "external_ips": ["1.2.3.4"], "internal_ips": ["10.0.0.1"]}
        ])))
        .mount(&server)
        .await;

    let vms = client(&server)
        .instances(Some("token"), Some("p-uuid"))
        .await
        .unwrap();
    assert_eq!(vms.len(), 1);
    assert_eq!(vms[0].external_ips, vec!["1.2.3.4".to_string()]);
}
