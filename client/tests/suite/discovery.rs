use port_migrator_client::{ApiError, CatalogApi};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{client_for, mount_auth};

#[tokio::test]
async fn blueprints_are_filtered_by_installation_and_deduplicated() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/data-sources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dataSources": [
                {
                    "blueprints": [{ "identifier": "service" }, { "identifier": "pullRequest" }],
                    "context": { "installationId": "123" }
                },
                {
                    "blueprints": [{ "identifier": "team" }],
                    "context": { "installationId": "999" }
                },
                {
                    "blueprints": [{ "identifier": "service" }, { "identifier": "issue" }],
                    "context": { "installationId": "123" }
                },
                {
                    "blueprints": [{ "identifier": "orphan" }],
                    "context": {}
                }
            ]
        })))
        .mount(&server)
        .await;

    let blueprints = client_for(&server).discover_blueprints("123").await.unwrap();
    assert_eq!(blueprints, vec!["issue", "pullRequest", "service"]);
}

#[tokio::test]
async fn unknown_installation_yields_no_blueprints() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/data-sources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "dataSources": [] })))
        .mount(&server)
        .await;

    let blueprints = client_for(&server).discover_blueprints("123").await.unwrap();
    assert!(blueprints.is_empty());
}

#[tokio::test]
async fn discovery_is_retried_on_server_errors() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/data-sources"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/data-sources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dataSources": [{
                "blueprints": [{ "identifier": "service" }],
                "context": { "installationId": "123" }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let blueprints = client_for(&server).discover_blueprints("123").await.unwrap();
    assert_eq!(blueprints, vec!["service"]);
}

#[tokio::test]
async fn integration_version_is_read_from_the_integration() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/integration/abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "integration": { "version": "0.2.14" } })),
        )
        .mount(&server)
        .await;

    let version = client_for(&server).integration_version("abc").await.unwrap();
    assert_eq!(version, "0.2.14");
}

#[tokio::test]
async fn missing_integration_is_reported_by_id() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/integration/nope"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).integration_version("nope").await.unwrap_err();
    assert!(
        matches!(&err, ApiError::IntegrationNotFound(id) if id == "nope"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn integration_without_version_is_rejected() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/integration/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "integration": {} })))
        .mount(&server)
        .await;

    let err = client_for(&server).integration_version("abc").await.unwrap_err();
    assert!(
        matches!(err, ApiError::MissingVersion(_)),
        "unexpected error: {err:?}"
    );
}
