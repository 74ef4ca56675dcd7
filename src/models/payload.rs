//! Webhook payload models.
//!
//! Only the fields the workflow consumes are declared; any of them missing
//! from the delivered JSON fails deserialization, which fails the whole
//! event rather than proceeding with partial data.

use serde::Deserialize;

/// A `pull_request` webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    /// Event sub-action, e.g. `opened`, `synchronize`, `closed`.
    pub action: String,

    /// Issue/PR number within the repository.
    pub number: u64,

    pub pull_request: PullRequest,

    pub repository: Repository,
}

/// The pull request itself.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// API URL of the pull request; fetched with the diff media type.
    pub url: String,

    /// PR description, scanned for an explicit `r? @name`.
    pub body: Option<String>,

    pub user: User,

    /// Currently assigned users; selection is skipped when non-empty.
    #[serde(default)]
    pub assignees: Vec<User>,

    pub head: CommitRef,

    pub base: BaseRef,
}

/// Head commit reference.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

/// Base branch reference, including the repository it lives in.
#[derive(Debug, Clone, Deserialize)]
pub struct BaseRef {
    /// Qualified branch label, e.g. `rust-lang:stable`.
    pub label: String,

    pub repo: BaseRepo,
}

/// The repository a PR targets.
#[derive(Debug, Clone, Deserialize)]
pub struct BaseRepo {
    pub name: String,

    pub owner: User,
}

/// A GitHub user.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

/// Top-level repository object on the event.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    /// `owner/repo`.
    pub full_name: String,

    /// Forks get no new-contributor detection (commit search lies for them).
    #[serde(default)]
    pub fork: bool,
}

impl BaseRef {
    /// The unqualified branch name, e.g. `stable` out of `rust-lang:stable`.
    pub fn branch(&self) -> &str {
        match self.label.split_once(':') {
            Some((_, branch)) => branch,
            None => &self.label,
        }
    }
}
