//! Request, parse, project and render through the command line.

use hauler::ErrorKind;
use hauler::auth::{TOKEN_ENV, TOKEN_ENV_ALIAS};
use hauler::cli::exit_code;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{COMMITMENTS, Sources, authorization_of_single_request, run_cli};

async fn commitments_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/broker-commitments"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/vnd.api+json")
                .set_body_string(COMMITMENTS),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_list_projects_included_buyer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/broker-commitments"))
        .and(query_param("fields[broker-commitments]", "status,label,buyer,seller,truck-scope"))
        .and(query_param("fields[brokers]", "company-name"))
        .and(query_param("include", "buyer,seller"))
        .and(query_param("filter[status]", "active"))
        .and(query_param("page[limit]", "50"))
        .and(header("authorization", "Bearer tok"))
        .and(header("accept", "application/vnd.api+json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(COMMITMENTS))
        .expect(1)
        .mount(&server)
        .await;

    let out = run_cli(
        &server,
        &Sources::empty(),
        &[
            "--token",
            "tok",
            "view",
            "broker-commitments",
            "list",
            "--filter",
            "status=active",
        ],
    )
    .await
    .unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "ID  STATUS  BUYERTYPE  BUYERID  BUYERNAME  SELLER  LABEL");
    assert_eq!(lines[1], "1   active  brokers    5        Acme       9");
}

#[tokio::test]
async fn test_list_json_rows() {
    let server = commitments_server().await;

    let out = run_cli(
        &server,
        &Sources::empty(),
        &["--token", "tok", "--json", "view", "broker-commitments", "list"],
    )
    .await
    .unwrap();

    let rows: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        rows,
        json!([{
            "ID": "1",
            "Status": "active",
            "BuyerType": "brokers",
            "BuyerID": "5",
            "BuyerName": "Acme",
            "Seller": "9",
            "Label": ""
        }])
    );
}

#[tokio::test]
async fn test_json_with_fields_echoes_server_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/truckers"))
        .and(query_param("fields[truckers]", "company-name,rating"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"data": [{"id": "4", "type": "truckers",
                          "attributes": {"company-name": "Haul Co", "rating": 4.5}}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let out = run_cli(
        &server,
        &Sources::empty(),
        &[
            "--no-auth",
            "--json",
            "--fields",
            "company-name,rating",
            "--include",
            "",
            "view",
            "truckers",
            "list",
        ],
    )
    .await
    .unwrap();

    let echoed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        echoed,
        json!([{"id": "4", "type": "truckers", "company-name": "Haul Co", "rating": 4.5}])
    );
}

#[tokio::test]
async fn test_no_auth_skips_every_source() {
    let server = commitments_server().await;
    let sources = Sources::empty();

    run_cli(
        &server,
        &sources,
        &["--no-auth", "view", "broker-commitments", "list"],
    )
    .await
    .unwrap();

    let reads = sources.env.reads();
    assert!(!reads.iter().any(|name| name == TOKEN_ENV || name == TOKEN_ENV_ALIAS));
    assert_eq!(sources.store.calls(), 0);
    assert_eq!(authorization_of_single_request(&server).await.unwrap(), None);
}

#[tokio::test]
async fn test_show_without_credential_is_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"data": {"id": "7", "type": "users", "attributes": {"name": "Dana", "is-admin": false}}}"#,
        ))
        .mount(&server)
        .await;

    let sources = Sources::empty();
    let out = run_cli(&server, &sources, &["view", "users", "show", "7"])
        .await
        .unwrap();

    assert_eq!(out, "ID: 7\nName: Dana\nAdmin: no\nDriver: no\n");
    assert_eq!(sources.store.calls(), 1);
    assert_eq!(authorization_of_single_request(&server).await.unwrap(), None);
}

#[tokio::test]
async fn test_empty_list_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": []}"#))
        .mount(&server)
        .await;

    let out = run_cli(&server, &Sources::empty(), &["--token", "tok", "view", "projects", "list"])
        .await
        .unwrap();
    assert_eq!(out, "No projects found.\n");
}

#[tokio::test]
async fn test_server_error_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/brokers/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            r#"{"errors": [{"title": "Not Found", "detail": "broker 404 does not exist"}]}"#,
        ))
        .mount(&server)
        .await;

    let err = run_cli(&server, &Sources::empty(), &["--token", "tok", "view", "brokers", "show", "404"])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "broker 404 does not exist");
    assert!(err.body().unwrap().contains("does not exist"));
    assert_eq!(exit_code(&err), 1);
}

#[tokio::test]
async fn test_unparsable_body_is_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = run_cli(&server, &Sources::empty(), &["--token", "tok", "view", "customers", "list"])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    assert_eq!(err.body(), Some("<html>maintenance</html>"));
}
