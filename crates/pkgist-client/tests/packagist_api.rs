//! Integration tests for PackagistClient over the reqwest transport.
//!
//! Uses wiremock as a stand-in registry: endpoint discovery through ping,
//! request shaping for every operation, and status handling.

use pkgist_client::{ClientConfig, ClientError, PackagistClient};
use pkgist_core::PackageDescriptor;
use sonic_rs::JsonValueTrait;
use wiremock::matchers::{body_json_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(mock_server: &MockServer) -> PackagistClient {
    let config = ClientConfig::default()
        .with_base_url(&mock_server.uri())
        .expect("valid mock url")
        .with_user_agent("pkgist-tests/1.0")
        .expect("valid user agent");
    PackagistClient::with_config(config).expect("failed to create client")
}

#[tokio::test]
async fn test_get_package() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/p/monolog/monolog.json"))
        .and(header("user-agent", "pkgist-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"packages":{"monolog/monolog":{"3.5.0":{"name":"monolog/monolog"}}}}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let value = client
        .get_package("monolog/monolog")
        .await
        .expect("request failed")
        .expect("expected a body");

    assert_eq!(
        value["packages"]["monolog/monolog"]["3.5.0"]["name"].as_str(),
        Some("monolog/monolog")
    );
}

#[tokio::test]
async fn test_search_sends_query_and_tags() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", "foo"))
        .and(query_param("tags", "bar"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"results":[{"name":"foo/bar","description":"Foo","downloads":3}],"total":1}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let results = client
        .search_results("foo", &["bar"], None)
        .await
        .expect("search failed");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "foo/bar");
}

#[tokio::test]
async fn test_notify_batch_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/downloads/"))
        .and(header("content-type", "application/json"))
        .and(body_json_string(
            r#"{"downloads":[{"name":"a/b","version":"1.0"},{"name":"c/d","version":"*"}]}"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"success"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let value = client
        .notify_batch(&[
            PackageDescriptor::new("a/b", "1.0"),
            PackageDescriptor::any_version("c/d"),
        ])
        .await
        .expect("notify failed")
        .expect("expected a body");

    assert_eq!(value["status"].as_str(), Some("success"));
}

#[tokio::test]
async fn test_notify_posts_to_package_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/downloads/a/b"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.notify("a/b").await.expect("notify failed");
    assert!(result.is_none(), "empty body should be None");
}

#[tokio::test]
async fn test_ping_adopts_advertised_endpoints() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/packages.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "packages": [],
                "notify": "/downloads/%package%",
                "notify-batch": "/downloads/",
                "search": "/search.json?q=%query%&type=%type%",
                "package": "/p2/%package%.json",
                "metadata-url": "/p2/%package%.json"
            }"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/p2/symfony/console.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"packages":{"symfony/console":[]}}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", "console"))
        .and(query_param("type", "library"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"results":[]}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let data = client.ping().await.expect("ping failed");
    assert!(data.is_some());

    client
        .get_package("symfony/console")
        .await
        .expect("package fetch failed");

    let results = client
        .search_results::<&str>("console", &[], Some("library"))
        .await
        .expect("search failed");
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_ping_empty_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/packages.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    assert!(client.ping().await.expect("ping failed").is_none());
}

#[tokio::test]
async fn test_ping_unreachable() {
    // Reserve a port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    let config = ClientConfig::default()
        .with_base_url(&format!("http://127.0.0.1:{port}"))
        .expect("valid url");
    let client = PackagistClient::with_config(config).expect("failed to create client");

    let err = client.ping().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { status: None, .. }));
}

#[tokio::test]
async fn test_not_found_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/p/missing/pkg.json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.get_package("missing/pkg").await.unwrap_err();
    assert_eq!(err.http_status(), Some(404));
}

#[tokio::test]
async fn test_server_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/packages/list.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.list_package_names().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { status: Some(503), .. }));
}

#[tokio::test]
async fn test_package_list_false_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/packages/list.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("false"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    assert!(client.get_packages().await.unwrap().is_none());
    assert!(client.list_package_names().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_package_name_is_escaped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/downloads/acme/odd%23name"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"success"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    assert!(client.notify("acme/odd#name").await.unwrap().is_some());
}
