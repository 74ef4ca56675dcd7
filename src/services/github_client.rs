//! GitHub API client.
//!
//! Thin gateway over the GitHub REST API: fetch the PR diff, assign a
//! reviewer, post comments, apply labels, and run the commit search used
//! for new-contributor detection. No retries: webhook redelivery is the
//! only recovery path, and conflict-style responses from an earlier
//! delivery are treated as success so replays stay idempotent.

use crate::error::AppError;
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;

const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";
const COMMIT_SEARCH_MEDIA_TYPE: &str = "application/vnd.github.cloak-preview";
const USER_AGENT: &str = concat!("pr-butler/", env!("CARGO_PKG_VERSION"));

/// GitHub API client configuration.
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// Base URL of the API (e.g. `https://api.github.com`).
    pub api_root: String,

    /// Token for the integration user; empty disables authentication.
    pub token: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            api_root: "https://api.github.com".to_string(),
            token: String::new(),
            timeout_secs: 30,
        }
    }
}

/// GitHub API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    config: GitHubClientConfig,
}

/// Response shape of the commit search endpoint.
#[derive(Debug, Deserialize)]
struct CommitSearchResults {
    total_count: u64,
}

impl GitHubClient {
    /// Create a new GitHub client.
    pub fn new(config: GitHubClientConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

        if !config.token.is_empty() {
            let token_value = header::HeaderValue::from_str(&format!("token {}", config.token))
                .map_err(|_| AppError::internal("invalid token format"))?;
            headers.insert(header::AUTHORIZATION, token_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build a full URL for an API path.
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_root.trim_end_matches('/'), path)
    }

    /// Parse a successful JSON response, turning failures into API errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<T, AppError> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| AppError::internal(format!("failed to parse response: {}", e)))
        } else {
            Err(Self::api_error(response, endpoint).await)
        }
    }

    /// Expect a bare success status; optionally treat 409 Conflict as an
    /// "already applied" success from an earlier delivery of this event.
    async fn expect_success(
        &self,
        response: Response,
        endpoint: &str,
        conflict_ok: bool,
    ) -> Result<(), AppError> {
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }
        if conflict_ok && status == StatusCode::CONFLICT {
            log::debug!("[github] {} already applied, treating as success", endpoint);
            return Ok(());
        }
        Err(Self::api_error(response, endpoint).await)
    }

    /// Build an API error carrying GitHub's `message` field when present.
    async fn api_error(response: Response, endpoint: &str) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(String::from))
            .unwrap_or_else(|| format!("request failed ({})", status));

        AppError::github_api_full(message, status.as_u16(), endpoint)
    }

    /// Fetch the unified diff for a pull request by its API URL.
    pub async fn get_diff(&self, pr_url: &str) -> Result<String, AppError> {
        let response = self
            .client
            .get(pr_url)
            .header(header::ACCEPT, DIFF_MEDIA_TYPE)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(response, pr_url).await);
        }

        response
            .text()
            .await
            .map_err(|e| AppError::internal(format!("failed to read diff: {}", e)))
    }

    /// Assign `assignee` to an issue. A conflict means a previous delivery
    /// already assigned them and counts as success.
    pub async fn set_assignee(
        &self,
        owner: &str,
        repo: &str,
        issue: u64,
        assignee: &str,
    ) -> Result<(), AppError> {
        let endpoint = format!("/repos/{}/{}/issues/{}", owner, repo, issue);
        let response = self
            .client
            .patch(self.api_url(&endpoint))
            .json(&serde_json::json!({ "assignee": assignee }))
            .send()
            .await?;

        self.expect_success(response, &endpoint, true).await
    }

    /// Post a comment on an issue. Conflicts count as success.
    pub async fn post_comment(
        &self,
        owner: &str,
        repo: &str,
        issue: u64,
        body: &str,
    ) -> Result<(), AppError> {
        let endpoint = format!("/repos/{}/{}/issues/{}/comments", owner, repo, issue);
        let response = self
            .client
            .post(self.api_url(&endpoint))
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?;

        self.expect_success(response, &endpoint, true).await
    }

    /// Add labels to an issue.
    pub async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        issue: u64,
        labels: &[String],
    ) -> Result<(), AppError> {
        let endpoint = format!("/repos/{}/{}/issues/{}/labels", owner, repo, issue);
        let response = self
            .client
            .post(self.api_url(&endpoint))
            .json(labels)
            .send()
            .await?;

        self.expect_success(response, &endpoint, false).await
    }

    /// True when `username` has no commits in `owner/repo`.
    ///
    /// The commit search answering 422 (or with zero results) means GitHub
    /// found no commits for that author, i.e. a new contributor. The fork
    /// short-circuit lives in the workflow, not here, because it depends on
    /// the event payload rather than on this endpoint.
    pub async fn is_new_contributor(
        &self,
        username: &str,
        owner: &str,
        repo: &str,
    ) -> Result<bool, AppError> {
        let query = format!("repo:{}/{}+author:{}", owner, repo, username);
        let endpoint = format!("/search/commits?q={}", urlencoding::encode(&query));
        let response = self
            .client
            .get(self.api_url(&endpoint))
            .header(header::ACCEPT, COMMIT_SEARCH_MEDIA_TYPE)
            .send()
            .await?;

        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            return Ok(true);
        }

        let results: CommitSearchResults = self.handle_response(response, &endpoint).await?;
        Ok(results.total_count == 0)
    }

    /// True when `username` is a collaborator in `owner/repo` (404 → false).
    pub async fn is_collaborator(
        &self,
        username: &str,
        owner: &str,
        repo: &str,
    ) -> Result<bool, AppError> {
        let endpoint = format!("/repos/{}/{}/collaborators/{}", owner, repo, username);
        let response = self.client.get(self.api_url(&endpoint)).send().await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Self::api_error(response, &endpoint).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_construction() {
        let client = GitHubClient::new(GitHubClientConfig {
            api_root: "https://api.github.com/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            client.api_url("/repos/acme/widgets/issues/1"),
            "https://api.github.com/repos/acme/widgets/issues/1"
        );
    }

    #[test]
    fn test_commit_search_query_encoding() {
        let query = format!("repo:{}/{}+author:{}", "acme", "widgets", "some-user");
        let encoded = urlencoding::encode(&query);
        assert_eq!(encoded, "repo%3Aacme%2Fwidgets%2Bauthor%3Asome-user");
    }

    #[test]
    fn test_commit_search_results_parse() {
        let results: CommitSearchResults =
            serde_json::from_str(r#"{"total_count": 0, "items": []}"#).unwrap();
        assert_eq!(results.total_count, 0);
    }
}
