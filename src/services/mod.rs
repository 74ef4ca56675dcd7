//! Business logic services.
//!
//! The core of the bot: configuration loading, diff attribution, reviewer
//! selection and the per-event decision workflow, plus the GitHub gateway
//! and the webhook HTTP server.
//!
//! Everything except the gateway and server is pure and synchronous, so
//! the selection heuristics are testable without any network.

pub mod config_store;
pub mod diff;
pub mod github_client;
pub mod handler;
pub mod reviewer;
pub mod webhook_server;

pub use config_store::ConfigStore;
pub use github_client::{GitHubClient, GitHubClientConfig};
pub use handler::Handler;
pub use webhook_server::AppState;
