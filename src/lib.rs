//! pr-butler - GitHub pull request welcome bot.
//!
//! Listens for `pull_request opened` webhook events, picks a reviewer from
//! the configured groups based on which directory the diff touched most,
//! posts welcome/review comments and mention notices, warns about risky
//! changes, and applies labels.

pub mod error;
pub mod models;
pub mod services;
pub mod settings;

pub use error::AppError;
pub use models::Decision;
pub use services::{AppState, ConfigStore, GitHubClient, GitHubClientConfig, Handler};
pub use settings::Settings;
