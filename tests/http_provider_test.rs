// Integration tests for the HTTP identity client against a mock server
use authflow::authentication::AuthFlowFactory;
use authflow::identity::{HttpIdentityProvider, IdentityProviderClient};
use authflow::models::{LoginRequest, Outcome};
use authflow::testing::TestFixtures;
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_authorization_code(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/oauth/grant-code"))
        .and(body_json(json!({
            "client_id": "test-client",
            "redirect_uri": "http://localhost"
        })))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_access_token(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/oauth/access-token"))
        .and(header("authorization", "Basic dGVzdDpzZWNyZXQ="))
        .and(body_json(json!({
            "grant_type": "authorization_code",
            "code": "abc"
        })))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("access_token", "AT1"))
        .and(header("client_id", "test-client"))
        .and(body_json(json!({
            "username": "YWxpY2U=",
            "password": "U0VDUkVUMQ==",
            "brand": "test-brand"
        })))
        .respond_with(response)
        .mount(server)
        .await;
}

fn code_created() -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({"code": "abc"}))
}

fn token_created() -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({
        "accessToken": "AT1",
        "refreshToken": "RT1"
    }))
}

async fn login_outcome(server: &MockServer) -> Option<Outcome> {
    let flow = AuthFlowFactory::create(&TestFixtures::settings(&server.uri())).unwrap();
    flow.login_by_username("alice", "Secret1").await.recv().await
}

#[tokio::test]
async fn test_full_login_over_http() {
    let server = MockServer::start().await;
    mount_authorization_code(&server, code_created()).await;
    mount_access_token(&server, token_created()).await;
    mount_login(
        &server,
        ResponseTemplate::new(200).set_body_json(TestFixtures::user_json()),
    )
    .await;

    let outcome = login_outcome(&server).await;
    let user = outcome.as_ref().and_then(Outcome::user).unwrap();
    assert_eq!(user.id(), Some(&json!("u1")));
    assert_eq!(user.access_token, "AT1");
    assert_eq!(user.refresh_token, "RT1");
    assert_eq!(user.user.attribute("name"), Some(&json!("Alice Example")));
}

#[tokio::test]
async fn test_unauthorized_token_stage_over_http() {
    let server = MockServer::start().await;
    mount_authorization_code(&server, code_created()).await;
    mount_access_token(
        &server,
        ResponseTemplate::new(401).set_body_string("<html>denied</html>"),
    )
    .await;
    Mock::given(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert_eq!(login_outcome(&server).await, Some(Outcome::Unauthorized));
}

#[tokio::test]
async fn test_server_error_over_http_posts_nothing() {
    let server = MockServer::start().await;
    mount_authorization_code(&server, ResponseTemplate::new(500)).await;

    assert_eq!(login_outcome(&server).await, None);
}

#[tokio::test]
async fn test_invalid_json_body_is_an_error() {
    let server = MockServer::start().await;
    mount_authorization_code(&server, ResponseTemplate::new(201).set_body_string("{not json"))
        .await;

    match login_outcome(&server).await {
        Some(Outcome::Error { message }) => {
            assert!(
                message.starts_with("invalid authorization code response body"),
                "{message}"
            );
        }
        other => panic!("expected an error outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_success_body_is_an_error() {
    let server = MockServer::start().await;
    mount_authorization_code(&server, ResponseTemplate::new(201)).await;

    assert_eq!(
        login_outcome(&server).await,
        Some(Outcome::Error {
            message: "empty response body from the authorization code endpoint".to_string()
        })
    );
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let server = MockServer::start().await;
    mount_authorization_code(&server, code_created().set_delay(Duration::from_secs(2))).await;

    let mut settings = TestFixtures::settings(&server.uri());
    settings.provider.timeout_ms = 100;
    let flow = AuthFlowFactory::create(&settings).unwrap();

    let outcome = flow.login_by_username("alice", "Secret1").await.recv().await;
    assert_eq!(outcome, Some(Outcome::TimedOut));
}

#[tokio::test]
async fn test_unreachable_provider_is_an_error_with_message() {
    // Nothing listens on the discard port
    let settings = TestFixtures::settings("http://127.0.0.1:9");
    let flow = AuthFlowFactory::create(&settings).unwrap();

    let outcome = flow.login_by_username("alice", "Secret1").await.recv().await;
    assert!(
        matches!(&outcome, Some(Outcome::Error { message }) if !message.is_empty()),
        "{outcome:?}"
    );
}

#[tokio::test]
async fn test_client_ignores_body_on_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(path("/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(TestFixtures::user_json()))
        .mount(&server)
        .await;

    let client = HttpIdentityProvider::from_settings(&TestFixtures::settings(&server.uri()).provider)
        .unwrap();
    let request = LoginRequest::by_username("alice", "Secret1", "test-brand").encode();
    let response = client.login(&request, "AT1", "test-client").await.unwrap();

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.body.is_none());
}
