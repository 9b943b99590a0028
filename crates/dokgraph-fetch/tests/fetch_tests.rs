//! Integration tests for dokgraph-fetch against a local mock service

use dokgraph_domain::traits::NodeSource;
use dokgraph_fetch::{FetchConfig, FetchError, WorkflowyClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHARE_URL: &str = "https://workflowy.com/s/learning/AbC123";

const SHARE_PAGE: &str = r#"<html><head><script>
    var PROJECT_TREE_DATA_URL_PARAMS = {"share_id": "AbC123"};
</script></head><body></body></html>"#;

const TREE: &str = r#"{"items": [
    {"id": "root", "prnt": null, "nm": "Spaced Repetition", "pr": 0},
    {"id": "dok3", "prnt": "root", "nm": "DOK3 - Insights", "pr": 1},
    {"id": "i1", "prnt": "dok3", "nm": "See <a href=\"https://x.org\">this</a>", "pr": 0},
    {"id": "c1", "prnt": "i1", "nm": "nice!", "pr": 0, "metadata": {"layoutMode": "cmnt"}}
]}"#;

fn client_for(server: &MockServer) -> WorkflowyClient {
    WorkflowyClient::new(FetchConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    })
    .unwrap()
}

async fn mount_share_page(server: &MockServer, cookie: Option<&str>, body: &str) {
    let mut response = ResponseTemplate::new(200).set_body_string(body);
    if let Some(cookie) = cookie {
        response = response.insert_header("set-cookie", cookie);
    }
    Mock::given(method("GET"))
        .and(path("/s/learning/AbC123"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_full_handshake() {
    let server = MockServer::start().await;
    mount_share_page(&server, Some("sessionid=sess-1; HttpOnly; Path=/"), SHARE_PAGE).await;

    Mock::given(method("GET"))
        .and(path("/get_tree_data/"))
        .and(query_param("share_id", "AbC123"))
        .and(header("cookie", "sessionid=sess-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TREE))
        .mount(&server)
        .await;

    let nodes = client_for(&server).fetch(SHARE_URL).await.unwrap();

    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].name, "Spaced Repetition");
    assert_eq!(nodes[2].name, "See [this](https://x.org)");
    assert!(nodes.iter().all(|n| n.id != "c1"));
}

#[tokio::test]
async fn test_invalid_url_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    let err = client_for(&server)
        .fetch("https://example.com/outline")
        .await
        .unwrap_err();

    assert!(err.is_input_error());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_missing_session_cookie() {
    let server = MockServer::start().await;
    mount_share_page(&server, None, SHARE_PAGE).await;

    let err = client_for(&server).fetch(SHARE_URL).await.unwrap_err();
    assert!(matches!(err, FetchError::MissingSession));
    assert!(!err.is_input_error());
}

#[tokio::test]
async fn test_missing_share_id() {
    let server = MockServer::start().await;
    mount_share_page(&server, Some("sessionid=sess-1"), "<html>nothing here</html>").await;

    let err = client_for(&server).fetch(SHARE_URL).await.unwrap_err();
    assert!(matches!(err, FetchError::MissingShareId));
}

#[tokio::test]
async fn test_upstream_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch(SHARE_URL).await.unwrap_err();
    assert!(matches!(err, FetchError::Http(_)));
}
