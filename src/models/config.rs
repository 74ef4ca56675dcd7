//! Reviewer configuration models.
//!
//! One JSON file per repository (`<owner>/<repo>.json`) plus a `_global.json`
//! with shared groups. Loaded once per incoming event and treated as
//! immutable afterwards.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

fn default_expected_branch() -> String {
    "master".to_string()
}

fn default_collapse_prefixes() -> Vec<String> {
    vec!["src/librustc".to_string()]
}

fn default_excluded_dirs() -> Vec<String> {
    vec!["src/test".to_string()]
}

/// Per-repository reviewer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoConfig {
    /// Branch pull requests are expected to target.
    #[serde(default = "default_expected_branch")]
    pub expected_branch: String,

    /// Link to the project's contribution instructions.
    #[serde(default)]
    pub contributing: Option<String>,

    /// Directory → alias tokens; drives heuristic reviewer selection.
    #[serde(default)]
    pub dirs: HashMap<String, Vec<String>>,

    /// Named reviewer groups. Must contain `all`; may nest other groups.
    pub groups: HashMap<String, Vec<String>>,

    /// Path pattern → mention rule, applied to every file in the diff.
    /// Ordered so that several patterns matching one file record their
    /// mentions in a stable order.
    #[serde(default)]
    pub mentions: BTreeMap<String, MentionRule>,

    /// Labels applied to every newly opened pull request.
    #[serde(default)]
    pub new_pr_labels: Vec<String>,

    /// Directory prefixes folded to a single unit during diff attribution.
    #[serde(default = "default_collapse_prefixes")]
    pub collapse_prefixes: Vec<String>,

    /// Directories whose changes never drive reviewer choice.
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,
}

/// Shared defaults merged into every repository's configuration.
///
/// A group name that also appears in a repository file is a configuration
/// conflict, not an override.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub groups: HashMap<String, Vec<String>>,
}

/// Who to notify when a configured path pattern is touched.
#[derive(Debug, Clone, Deserialize)]
pub struct MentionRule {
    /// Free-text line prepended to the cc line.
    #[serde(default)]
    pub message: Option<String>,

    /// Bot command posted once per distinct command, with the head SHA.
    #[serde(default)]
    pub command: Option<String>,

    /// Usernames to cc, stored with their `@` prefix.
    pub reviewers: Vec<String>,
}
