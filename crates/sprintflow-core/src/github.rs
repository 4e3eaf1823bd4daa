//! Issue-tracker client
//!
//! Two remote calls: a token capability check and pull request creation.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FlowError;

const USER_AGENT: &str = concat!("sprintflow/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything needed to open a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestSpec {
    #[serde(skip)]
    pub owner: String,
    #[serde(skip)]
    pub repo: String,
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
}

/// A created pull request (subset of fields we care about)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}

/// Remote issue tracker
pub trait IssueTracker {
    /// Returns `Ok(true)` when the tracker accepts `token`
    fn validate_token(&self, token: &str) -> Result<bool, FlowError>;

    fn create_pull_request(
        &self,
        token: &str,
        spec: &PullRequestSpec,
    ) -> Result<PullRequest, FlowError>;
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// GitHub REST client
pub struct GitHubClient {
    api_url: String,
    client: Client,
}

impl GitHubClient {
    pub fn new(api_url: &str) -> Result<Self, FlowError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FlowError::Http(e.to_string()))?;
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn authorized(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request
            .header("Authorization", format!("token {}", token))
            .header("Accept", "application/vnd.github+json")
    }

    fn send(request: RequestBuilder) -> Result<Response, FlowError> {
        request.send().map_err(|e| FlowError::Http(e.to_string()))
    }
}

/// Turn a non-success response into [`FlowError::Api`]
fn api_error(response: Response) -> FlowError {
    let status = response.status();
    let message = response
        .json::<ApiErrorBody>()
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
    FlowError::Api {
        status: status.as_u16(),
        message,
    }
}

impl IssueTracker for GitHubClient {
    fn validate_token(&self, token: &str) -> Result<bool, FlowError> {
        let url = format!("{}/rate_limit", self.api_url);
        debug!(%url, "validating token");
        let response = Self::send(self.authorized(self.client.get(&url), token))?;
        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(false),
            _ => Err(api_error(response)),
        }
    }

    fn create_pull_request(
        &self,
        token: &str,
        spec: &PullRequestSpec,
    ) -> Result<PullRequest, FlowError> {
        let url = format!("{}/repos/{}/{}/pulls", self.api_url, spec.owner, spec.repo);
        debug!(%url, head = %spec.head, base = %spec.base, "creating pull request");
        let response = Self::send(self.authorized(self.client.post(&url), token).json(spec))?;
        if !response.status().is_success() {
            return Err(api_error(response));
        }
        response
            .json::<PullRequest>()
            .map_err(|e| FlowError::Http(format!("failed to parse pull request response: {}", e)))
    }
}
