//! HTTP transport and end-to-end resolves against a mock profile service.

use mockito::{Matcher, Server};
use profile_lookup::batch::LookupRequest;
use profile_lookup::telemetry::NoopObserver;
use profile_lookup::{
    BatchProfileResolver, EndpointConfig, HttpProfileTransport, InMemorySink, LookupOutcome,
    ProfileTransport, ResolverConfig, TransportError,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn endpoint(base_url: &str) -> EndpointConfig {
    EndpointConfig::new(base_url).with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn test_search_posts_names_and_decodes_profiles() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/profiles/minecraft")
        .match_header("content-type", "application/json")
        .match_header("x-profile-lookup-request-id", Matcher::Any)
        .match_body(Matcher::Json(json!(["notch", "jeb_"])))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id":"069a79f444e94726a5befca90e38aaf5","name":"Notch"}]"#)
        .create_async()
        .await;

    let transport = HttpProfileTransport::new(&endpoint(&server.url())).unwrap();
    let profiles = transport
        .search(&LookupRequest::from_names(["Notch", "jeb_"]))
        .await
        .unwrap();

    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].name, "Notch");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_agent_is_part_of_the_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/profiles/scrolls")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let transport =
        HttpProfileTransport::new(&endpoint(&server.url()).with_agent("Scrolls")).unwrap();
    assert!(transport
        .search(&LookupRequest::from_names(["x"]))
        .await
        .unwrap()
        .is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/profiles/minecraft")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let transport = HttpProfileTransport::new(&endpoint(&server.url())).unwrap();
    let err = transport
        .search(&LookupRequest::from_names(["alice"]))
        .await
        .unwrap_err();
    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_envelope() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/profiles/minecraft")
        .with_status(200)
        .with_body(r#"{"error":"IllegalArgumentException","errorMessage":"Not more that 10 profile name per call is allowed."}"#)
        .create_async()
        .await;

    let transport = HttpProfileTransport::new(&endpoint(&server.url())).unwrap();
    let err = transport
        .search(&LookupRequest::from_names(["alice"]))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Remote { ref error, .. } if error == "IllegalArgumentException"));
}

#[tokio::test]
async fn test_unreachable_host_is_http_error() {
    // Grab a free port, then release it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let transport = HttpProfileTransport::new(
        &EndpointConfig::new(format!("http://127.0.0.1:{port}/"))
            .with_timeout(Duration::from_secs(2)),
    )
    .unwrap();
    let err = transport
        .search(&LookupRequest::from_names(["alice"]))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Http(_)));
}

#[test]
fn test_invalid_endpoint_fails_at_construction() {
    assert!(HttpProfileTransport::new(&EndpointConfig::new("::not-a-url::")).is_err());
    let err = HttpProfileTransport::new(
        &EndpointConfig::default().with_proxy_url("http://[not-closed"),
    )
    .err()
    .unwrap();
    assert_eq!(err.setting(), Some("endpoint.proxy_url"));
}

#[tokio::test]
async fn test_resolve_end_to_end_with_retries() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("POST", "/profiles/minecraft")
        .match_body(Matcher::Json(json!(["alice", "bob"])))
        .with_status(200)
        .with_body(r#"[{"id":"a1","name":"Alice"}]"#)
        .expect(1)
        .create_async()
        .await;
    let down = server
        .mock("POST", "/profiles/minecraft")
        .match_body(Matcher::Json(json!(["carol"])))
        .with_status(503)
        .with_body("try later")
        .expect(2)
        .create_async()
        .await;

    let resolver = BatchProfileResolver::builder()
        .config(
            ResolverConfig::default()
                .with_max_attempts(2)
                .with_retry_delay(Duration::from_millis(10))
                .with_inter_batch_delay(Duration::from_millis(1)),
        )
        .http_transport(&endpoint(&server.url()))
        .unwrap()
        .observer(Arc::new(NoopObserver))
        .build()
        .unwrap();
    let sink = InMemorySink::new();

    let stats = resolver.resolve(["Alice", "BOB", "carol"], &sink).await;

    assert_eq!(sink.resolved()[0].id.as_deref(), Some("a1"));
    assert_eq!(sink.not_found(), vec!["bob".to_string()]);
    let failed: Vec<LookupOutcome> = sink
        .outcomes()
        .into_iter()
        .filter(LookupOutcome::is_failed)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name(), "carol");
    assert_eq!(stats.retries, 1);

    ok.assert_async().await;
    down.assert_async().await;
}
