//! Data models for the application.
//!
//! Configuration records are passive value objects deserialized from JSON
//! files; payload models mirror the webhook JSON; the decision is the
//! request-scoped action plan the workflow produces.

pub mod config;
pub mod decision;
pub mod payload;

// Re-exports for convenient access
pub use config::{GlobalConfig, MentionRule, RepoConfig};
pub use decision::Decision;
pub use payload::{BaseRef, BaseRepo, CommitRef, PullRequest, PullRequestEvent, Repository, User};
