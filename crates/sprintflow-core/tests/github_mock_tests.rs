//! HTTP mock tests for the GitHub client.
//!
//! Uses wiremock to stand in for the GitHub REST API. The client is blocking,
//! so each call runs on a blocking thread next to the mock server's runtime.

use serde_json::json;
use sprintflow_core::{FlowError, GitHubClient, IssueTracker, PullRequest, PullRequestSpec};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a client against `api_url` and run `call` with it off the async runtime
async fn with_client<T, F>(api_url: String, call: F) -> T
where
    T: Send + 'static,
    F: FnOnce(&GitHubClient) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let client = GitHubClient::new(&api_url).unwrap();
        call(&client)
    })
    .await
    .unwrap()
}

fn login_pull_request() -> PullRequestSpec {
    PullRequestSpec {
        owner: "acme".to_string(),
        repo: "rocket".to_string(),
        title: "apollo-sprint-3/42-add-login".to_string(),
        head: "apollo-sprint-3/42-add-login".to_string(),
        base: "apollo/sprint-3".to_string(),
        body: "Closes #42".to_string(),
    }
}

// =============================================================================
// Token validation
// =============================================================================

#[tokio::test]
async fn test_validate_token_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .and(header("Authorization", "token ghp_good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resources": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| client.validate_token("ghp_good")).await;

    assert!(matches!(result, Ok(true)));
}

#[tokio::test]
async fn test_validate_token_unauthorized_and_forbidden_are_rejections() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .and(header("Authorization", "token ghp_revoked"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .and(header("Authorization", "token ghp_no_scope"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let (revoked, no_scope) = with_client(server.uri(), |client| {
        (
            client.validate_token("ghp_revoked"),
            client.validate_token("ghp_no_scope"),
        )
    })
    .await;

    assert!(matches!(revoked, Ok(false)));
    assert!(matches!(no_scope, Ok(false)));
}

#[tokio::test]
async fn test_validate_token_server_error_carries_github_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"message": "Service unavailable"})),
        )
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| client.validate_token("ghp_good")).await;

    match result {
        Err(FlowError::Api { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "Service unavailable");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

// =============================================================================
// Pull request creation
// =============================================================================

#[tokio::test]
async fn test_create_pull_request_posts_payload_and_parses_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/acme/rocket/pulls"))
        .and(header("Authorization", "token ghp_good"))
        .and(body_json(json!({
            "title": "apollo-sprint-3/42-add-login",
            "head": "apollo-sprint-3/42-add-login",
            "base": "apollo/sprint-3",
            "body": "Closes #42",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "number": 17,
            "html_url": "https://github.com/acme/rocket/pull/17",
            "state": "open",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| {
        client.create_pull_request("ghp_good", &login_pull_request())
    })
    .await;

    assert_eq!(
        result.unwrap(),
        PullRequest {
            number: 17,
            html_url: "https://github.com/acme/rocket/pull/17".to_string(),
        }
    );
}

#[tokio::test]
async fn test_create_pull_request_validation_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/acme/rocket/pulls"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "errors": [{"message": "A pull request already exists"}],
        })))
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| {
        client.create_pull_request("ghp_good", &login_pull_request())
    })
    .await;

    match result {
        Err(FlowError::Api { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "Validation Failed");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_pull_request_error_without_json_uses_reason_phrase() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/acme/rocket/pulls"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>upstream</html>"))
        .mount(&server)
        .await;

    // Trailing slash on the API url is tolerated
    let result = with_client(format!("{}/", server.uri()), |client| {
        client.create_pull_request("ghp_good", &login_pull_request())
    })
    .await;

    match result {
        Err(FlowError::Api { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
