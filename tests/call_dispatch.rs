mod common;

use reqwest::StatusCode;
use todo_portal::dispatch::{ApiMethod, RequestOptions};
use todo_portal::session::{ACCESS_TOKEN_KEY, MemorySession, REFRESH_TOKEN_KEY, SessionStore};
use todo_portal::{CallOutcome, Error};
use wiremock::matchers::{any, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TODOS: &str = r#"[{"id":1,"title":"x","complete":false}]"#;

async fn mount_refresh(server: &MockServer, status: u16, body: serde_json::Value, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn missing_access_token_needs_login_without_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let caller = common::caller(&server);
    let url = caller.context().endpoints().resource("todos/");
    let session = MemorySession::with_values([(REFRESH_TOKEN_KEY, "R1")]);

    for method in [ApiMethod::Get, ApiMethod::Post, ApiMethod::Patch, ApiMethod::Delete] {
        let outcome = caller
            .call(&session, method, &url, &RequestOptions::new())
            .await
            .expect("no transport involved");
        assert_eq!(outcome, CallOutcome::NeedsLogin, "{method}");
    }
}

#[tokio::test]
async fn get_200_passes_body_through_without_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/todos/"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TODOS))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, 200, serde_json::json!({"access": "unused"}), 0).await;

    let caller = common::caller(&server);
    let url = caller.context().endpoints().resource("todos/");
    let session = MemorySession::with_values([(ACCESS_TOKEN_KEY, "A1")]);

    let outcome = caller
        .call(&session, ApiMethod::Get, &url, &RequestOptions::new())
        .await
        .unwrap();

    match outcome {
        CallOutcome::Success(resp) => {
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(resp.body(), TODOS);
        }
        other => panic!("expected Success, got {other:?}"),
    }
    assert_eq!(
        session.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(),
        Some("A1")
    );
}

#[tokio::test]
async fn unauthorized_without_refresh_token_needs_login_after_one_dispatch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/todos/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, 200, serde_json::json!({"access": "A2"}), 0).await;

    let caller = common::caller(&server);
    let url = caller.context().endpoints().resource("todos/");
    let session = MemorySession::with_values([(ACCESS_TOKEN_KEY, "A1")]);

    let outcome = caller
        .call(&session, ApiMethod::Get, &url, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(outcome, CallOutcome::NeedsLogin);
    assert_eq!(session.get(REFRESH_TOKEN_KEY).await.unwrap(), None);
    assert_eq!(
        session.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(),
        Some("A1"),
        "nothing to clear when there was no refresh token"
    );
}

#[tokio::test]
async fn successful_refresh_retries_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/todos/"))
        .and(header("Authorization", "Bearer A1"))
        .and(body_string("title=milk"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/todos/"))
        .and(header("Authorization", "Bearer A2"))
        .and(body_string("title=milk"))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":2}"#))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, 200, serde_json::json!({"access": "A2"}), 1).await;

    let caller = common::caller(&server);
    let url = caller.context().endpoints().resource("todos/");
    let session = MemorySession::with_values([(ACCESS_TOKEN_KEY, "A1"), (REFRESH_TOKEN_KEY, "R1")]);

    let outcome = caller
        .call(
            &session,
            ApiMethod::Post,
            &url,
            &RequestOptions::new().form([("title", "milk")]),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome.response().map(|r| r.status()),
        Some(StatusCode::CREATED)
    );
    assert_eq!(
        session.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(),
        Some("A2")
    );
    assert_eq!(
        session.get(REFRESH_TOKEN_KEY).await.unwrap().as_deref(),
        Some("R1")
    );
}

#[tokio::test]
async fn second_401_on_get_needs_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/todos/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, 200, serde_json::json!({"access": "A2"}), 1).await;

    let caller = common::caller(&server);
    let url = caller.context().endpoints().resource("todos/");
    let session = MemorySession::with_values([(ACCESS_TOKEN_KEY, "A1"), (REFRESH_TOKEN_KEY, "R1")]);

    let outcome = caller
        .call(&session, ApiMethod::Get, &url, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(outcome, CallOutcome::NeedsLogin);
}

#[tokio::test]
async fn second_401_on_mutation_is_surfaced_as_success() {
    for (api_method, verb) in [
        (ApiMethod::Post, "POST"),
        (ApiMethod::Patch, "PATCH"),
        (ApiMethod::Delete, "DELETE"),
    ] {
        let server = MockServer::start().await;
        Mock::given(method(verb))
            .and(path("/api/todos/1/"))
            .respond_with(ResponseTemplate::new(401).set_body_string("still no"))
            .expect(2)
            .mount(&server)
            .await;
        mount_refresh(&server, 200, serde_json::json!({"access": "A2"}), 1).await;

        let caller = common::caller(&server);
        let url = caller.context().endpoints().resource("todos/1/");
        let session =
            MemorySession::with_values([(ACCESS_TOKEN_KEY, "A1"), (REFRESH_TOKEN_KEY, "R1")]);

        let outcome = caller
            .call(&session, api_method, &url, &RequestOptions::new())
            .await
            .unwrap();

        match outcome {
            CallOutcome::Success(resp) => {
                assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{verb}");
                assert_eq!(resp.body(), "still no");
            }
            other => panic!("{verb}: expected Success, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn refresh_rejected_with_403_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/todos/1/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, 403, serde_json::json!({"detail": "Token is invalid"}), 1).await;

    let caller = common::caller(&server);
    let url = caller.context().endpoints().resource("todos/1/");
    let session = MemorySession::with_values([(ACCESS_TOKEN_KEY, "A1"), (REFRESH_TOKEN_KEY, "R1")]);

    let outcome = caller
        .call(&session, ApiMethod::Patch, &url, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(outcome, CallOutcome::NeedsLogin);
    assert_eq!(session.get(ACCESS_TOKEN_KEY).await.unwrap(), None);
    assert_eq!(session.get(REFRESH_TOKEN_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn refresh_200_without_access_token_counts_as_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/todos/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, 200, serde_json::json!({}), 1).await;

    let caller = common::caller(&server);
    let url = caller.context().endpoints().resource("todos/");
    let session = MemorySession::with_values([(ACCESS_TOKEN_KEY, "A1"), (REFRESH_TOKEN_KEY, "R1")]);

    let outcome = caller
        .call(&session, ApiMethod::Get, &url, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(outcome, CallOutcome::NeedsLogin);
    assert!(session.is_empty().await);
}

#[tokio::test]
async fn get_server_error_is_reported_as_needs_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/todos/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, 200, serde_json::json!({"access": "A2"}), 0).await;

    let caller = common::caller(&server);
    let url = caller.context().endpoints().resource("todos/");
    let session = MemorySession::with_values([(ACCESS_TOKEN_KEY, "A1"), (REFRESH_TOKEN_KEY, "R1")]);

    let outcome = caller
        .call(&session, ApiMethod::Get, &url, &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(outcome, CallOutcome::NeedsLogin);
    assert_eq!(
        session.get(REFRESH_TOKEN_KEY).await.unwrap().as_deref(),
        Some("R1"),
        "a 500 is not an authorization failure; tokens stay"
    );
}

#[tokio::test]
async fn query_options_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/todos/"))
        .and(query_param("complete", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let caller = common::caller(&server);
    let url = caller.context().endpoints().resource("todos/");
    let session = MemorySession::with_values([(ACCESS_TOKEN_KEY, "A1")]);

    let outcome = caller
        .call(
            &session,
            ApiMethod::Get,
            &url,
            &RequestOptions::new().query("complete", "false"),
        )
        .await
        .unwrap();

    assert!(matches!(outcome, CallOutcome::Success(_)));
}

#[tokio::test]
async fn transport_failure_propagates_as_error() {
    let config =
        todo_portal::Config::from_values("http://127.0.0.1:9/api", None, None, Some(2), None);
    let caller = todo_portal::AuthenticatedCaller::new(
        todo_portal::request_context::UpstreamContext::from_config(&config).unwrap(),
    );
    let session = MemorySession::with_values([(ACCESS_TOKEN_KEY, "A1")]);

    let err = caller
        .call(
            &session,
            ApiMethod::Get,
            "http://127.0.0.1:9/api/todos/",
            &RequestOptions::new(),
        )
        .await
        .expect_err("connection should fail");

    assert!(matches!(err, Error::Http(_)), "unexpected error: {err}");
}
