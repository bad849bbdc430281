//! Request pipeline tests against a mock API server

mod common;

use std::time::Duration;

use common::{ACCOUNT, TOKEN, api_error, ok, request_count, session};
use futures::future::join_all;
use pretty_assertions::assert_eq;
use serde_json::json;
use spotinst_config::ConfigError;
use spotinst_sdk::service::ocean::aws::Cluster;
use spotinst_sdk::{
    CancellationToken, Client, Config, Context, ContextError, Error, Request, Session, Spotinst,
    Value,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_decodes_successful_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ocean/aws/k8s/cluster/o-1"))
        .respond_with(ok(
            "spotinst:ocean:aws:k8s",
            vec![json!({"id": "o-1", "name": "prod", "region": "us-west-2"})],
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(&session(&server));
    let response = client
        .execute(
            &Context::background(),
            Request::get("/ocean/aws/k8s/cluster/{clusterId}").path_param("clusterId", "o-1"),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.request_id.as_deref(), Some("req-test"));
    assert_eq!(response.kind.as_deref(), Some("spotinst:ocean:aws:k8s"));
    assert_eq!(response.count, 1);

    let cluster: Cluster = response.first_item().unwrap().unwrap();
    assert_eq!(
        cluster,
        Cluster {
            id: Some("o-1".to_string()),
            name: Some("prod".to_string()),
            region: Some("us-west-2".to_string()),
            ..Default::default()
        }
    );
}

#[tokio::test]
async fn test_sends_auth_headers_and_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/setup/account"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(query_param("accountId", ACCOUNT))
        .respond_with(ok("spotinst:setup:account", vec![]))
        .expect(1)
        .mount(&server)
        .await;

    Client::new(&session(&server))
        .execute(&Context::background(), Request::get("/setup/account"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", spotinst_config::DEFAULT_USER_AGENT))
        .respond_with(ok("k", vec![]))
        .expect(1)
        .mount(&server)
        .await;

    Client::new(&session(&server))
        .execute(&Context::background(), Request::get("/setup/account"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_not_found_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ocean/aws/k8s/cluster/o-missing"))
        .respond_with(api_error(404, "NOT_FOUND", "x"))
        .mount(&server)
        .await;

    let spotinst = Spotinst::new(&session(&server));
    let err = spotinst
        .ocean
        .aws
        .read_cluster(&Context::background(), "o-missing")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    let api = err.api_error().unwrap();
    assert_eq!(api.status, 404);
    assert_eq!(api.request_id.as_deref(), Some("req-err"));
    assert_eq!(api.code(), Some("NOT_FOUND"));
    assert_eq!(api.message(), Some("x"));
}

#[tokio::test]
async fn test_non_json_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
        .mount(&server)
        .await;

    let err = Client::new(&session(&server))
        .execute(&Context::background(), Request::get("/setup/account"))
        .await
        .unwrap_err();

    assert!(err.is_server_error());
    assert!(err.is_retryable());
    let api = err.api_error().unwrap();
    assert_eq!(api.code(), Some("SERVICE_UNAVAILABLE"));
    assert_eq!(api.message(), Some("service unavailable"));
}

#[tokio::test]
async fn test_undecodable_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = Client::new(&session(&server))
        .execute(&Context::background(), Request::get("/setup/account"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn test_empty_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let spotinst = Spotinst::new(&session(&server));
    spotinst
        .ocean
        .aws
        .delete_cluster(&Context::background(), "o-1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cancelled_context_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok("k", vec![]))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = Context::background();
    ctx.cancel();

    let spotinst = Spotinst::new(&session(&server));
    let err = spotinst.ocean.aws.list_clusters(&ctx).await.unwrap_err();

    assert!(matches!(err, Error::Context(ContextError::Cancelled)));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok("k", vec![]).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let ctx = Context::background().with_cancellation(&token);

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let started = std::time::Instant::now();
    let err = Client::new(&session(&server))
        .execute(&ctx, Request::get("/setup/account"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Context(ContextError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_deadline_exceeded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok("k", vec![]).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let ctx = Context::background().with_timeout(Duration::from_millis(100));
    let err = Client::new(&session(&server))
        .execute(&ctx, Request::get("/setup/account"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Context(ContextError::DeadlineExceeded)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let session = Session::builder()
        .config(
            Config::new()
                .with_base_url("http://127.0.0.1:1")
                .unwrap()
                .with_credentials(Value::new(TOKEN, ACCOUNT)),
        )
        .without_discovery()
        .build()
        .unwrap();

    let err = Client::new(&session)
        .execute(&Context::background(), Request::get("/setup/account"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_missing_credentials_is_config_error() {
    let server = MockServer::start().await;
    let session = Session::builder()
        .config(Config::new().with_base_url(&server.uri()).unwrap())
        .without_discovery()
        .build()
        .unwrap();

    let err = Client::new(&session)
        .execute(&Context::background(), Request::get("/setup/account"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::MissingCredentials)));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_unbound_path_param_sends_nothing() {
    let server = MockServer::start().await;

    let err = Client::new(&session(&server))
        .execute(
            &Context::background(),
            Request::get("/ocean/aws/k8s/cluster/{clusterId}"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_concurrent_calls_share_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ocean/aws/k8s/cluster"))
        .respond_with(ok(
            "spotinst:ocean:aws:k8s",
            vec![json!({"id": "o-1"}), json!({"id": "o-2"})],
        ))
        .expect(100)
        .mount(&server)
        .await;

    let spotinst = Spotinst::new(&session(&server));
    let ctx = Context::background();

    let results = join_all((0..100).map(|_| spotinst.ocean.aws.list_clusters(&ctx))).await;

    assert_eq!(results.len(), 100);
    for result in results {
        assert_eq!(result.unwrap().len(), 2);
    }
}
