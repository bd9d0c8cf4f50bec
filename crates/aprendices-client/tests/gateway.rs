//! Request construction and response classification against a mock backend.

mod common;

use std::time::Duration;

use aprendices_client::{
    CancellationToken, ClientConfig, RequestSpec, ResponseOutcome, ServerErrorKind,
};
use aprendices_core::Credential;
use aprendices_session::SessionStore;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::harness;

fn server_error(outcome: ResponseOutcome) -> aprendices_client::ServerError {
    match outcome {
        ResponseOutcome::ServerError(e) => e,
        other => panic!("expected ServerError, got {other:?}"),
    }
}

#[tokio::test]
async fn sends_default_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/data"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(ClientConfig::cross_origin(server.uri()));
    let outcome = h.gateway().execute("/api/data", RequestSpec::get()).await;

    assert_eq!(outcome, ResponseOutcome::Success(json!({"ok": true})));
}

#[tokio::test]
async fn content_type_default_is_configurable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let config = ClientConfig {
        json_content_type: false,
        ..ClientConfig::cross_origin(server.uri())
    };
    let h = harness(config);
    h.gateway().execute("/", RequestSpec::get()).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("content-type").is_none());
    assert_eq!(requests[0].headers.get("accept").unwrap(), "application/json");
}

#[tokio::test]
async fn caller_headers_override_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("accept", "text/csv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(ClientConfig::cross_origin(server.uri()));
    let outcome = h
        .gateway()
        .execute("/export", RequestSpec::get().header("Accept", "text/csv"))
        .await;

    assert!(outcome.is_success());
}

#[tokio::test]
async fn bearer_attached_only_when_required() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let h = harness(ClientConfig::cross_origin(server.uri()));
    h.store.set_credential(Credential::new("tok-123")).unwrap();

    h.gateway().execute("/open", RequestSpec::get()).await;
    h.gateway()
        .execute("/closed", RequestSpec::get().authenticated())
        .await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(
        requests[1].headers.get("authorization").unwrap(),
        "Bearer tok-123"
    );
}

#[tokio::test]
async fn missing_credential_still_sends_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(ClientConfig::cross_origin(server.uri()));
    let outcome = h
        .gateway()
        .execute("/closed", RequestSpec::get().authenticated())
        .await;

    assert!(outcome.is_success());
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn json_body_is_serialized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/create"))
        .and(body_string(r#"{"nombre":"Ana"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(ClientConfig::cross_origin(server.uri()));
    let outcome = h
        .gateway()
        .execute(
            "/users/create",
            RequestSpec::post().json(json!({"nombre": "Ana"})),
        )
        .await;

    assert_eq!(outcome, ResponseOutcome::Success(json!({"id": 1})));
}

#[tokio::test]
async fn no_content_is_empty_success_regardless_of_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204).set_body_string("ignored"))
        .mount(&server)
        .await;

    let h = harness(ClientConfig::cross_origin(server.uri()));
    let outcome = h.gateway().execute("/users/create", RequestSpec::post()).await;

    assert_eq!(outcome, ResponseOutcome::EmptySuccess);
}

#[tokio::test]
async fn unauthorized_clears_session_even_on_exempt_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&server)
        .await;

    let h = harness(ClientConfig::cross_origin(server.uri()));
    h.store.set_credential(Credential::new("stale")).unwrap();

    let outcome = h.gateway().execute("/api/data", RequestSpec::get()).await;

    assert_eq!(outcome, ResponseOutcome::AuthFailure);
    assert!(h.store.credential().is_none());
    assert_eq!(h.observer.expired_count(), 1);
    assert_eq!(h.observer.redirect_count(), 1);
}

#[tokio::test]
async fn detail_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Centro no encontrado"})))
        .mount(&server)
        .await;

    let h = harness(ClientConfig::cross_origin(server.uri()));
    let err = server_error(h.gateway().execute("/users/get-by-centro", RequestSpec::get()).await);

    assert_eq!(err.message, "Centro no encontrado");
    assert_eq!(err.kind, ServerErrorKind::Status(404));
}

#[tokio::test]
async fn error_key_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "fallo interno"})))
        .mount(&server)
        .await;

    let h = harness(ClientConfig::cross_origin(server.uri()));
    let err = server_error(h.gateway().execute("/api/data", RequestSpec::get()).await);

    assert_eq!(err.message, "fallo interno");
}

#[tokio::test]
async fn unparsable_error_body_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let h = harness(ClientConfig::cross_origin(server.uri()));
    let err = server_error(h.gateway().execute("/api/data", RequestSpec::get()).await);

    assert_eq!(err.message, "server error (HTTP 503)");
    assert_eq!(err.kind, ServerErrorKind::Status(503));
}

#[tokio::test]
async fn malformed_success_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let h = harness(ClientConfig::cross_origin(server.uri()));
    let err = server_error(h.gateway().execute("/api/data", RequestSpec::get()).await);

    assert_eq!(err.kind, ServerErrorKind::Parse);
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let uri = format!("http://127.0.0.1:{port}");

    let h = harness(ClientConfig::cross_origin(uri));
    let err = server_error(h.gateway().execute("/", RequestSpec::get()).await);

    assert_eq!(err.kind, ServerErrorKind::Transport);
    assert!(err.message.starts_with("request failed"));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let h = harness(ClientConfig::cross_origin(server.uri()));
    let spec = RequestSpec::get().with_timeout(Duration::from_millis(100));
    let err = server_error(h.gateway().execute("/api/data", spec).await);

    assert_eq!(err.kind, ServerErrorKind::Timeout);
}

#[tokio::test]
async fn cancelled_call_yields_cancelled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let h = harness(ClientConfig::cross_origin(server.uri()));
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let spec = RequestSpec::get().with_cancellation(token);
    let err = server_error(h.gateway().execute("/api/data", spec).await);

    assert_eq!(err.kind, ServerErrorKind::Cancelled);
}

#[tokio::test]
async fn same_origin_paths_resolve_against_origin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(ClientConfig::same_origin(server.uri()));
    let outcome = h.gateway().execute("/api/data", RequestSpec::get()).await;

    assert!(outcome.is_success());
}

#[tokio::test]
async fn relative_address_without_origin_sends_nothing() {
    let h = harness(ClientConfig::default());
    let err = server_error(h.gateway().execute("/api/data", RequestSpec::get()).await);

    assert_eq!(err.kind, ServerErrorKind::InvalidRequest);
}
