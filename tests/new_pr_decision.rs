//! End-to-end decision construction for a newly opened pull request.
//!
//! Exercises the full pure pipeline (diff attribution, mention
//! extraction, reviewer selection, message composition) from a
//! realistic config and diff, without any network.

use pr_butler::models::{PullRequestEvent, RepoConfig};
use pr_butler::services::handler::build_decision;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn repo_config() -> RepoConfig {
    serde_json::from_value(serde_json::json!({
        "expected_branch": "master",
        "dirs": {
            "src/librustc": ["compiler"],
            "src/doc": ["@docs-reviewer"]
        },
        "groups": {
            "all": ["@alice"],
            "compiler": ["@bob", "@carol"],
            "core": ["@alice", "@bob"]
        },
        "mentions": {
            "src/doc": {
                "message": "The documentation was modified.",
                "reviewers": ["@docs-reviewer", "@editor"]
            },
            "src/tools/clippy": {
                "command": "@bot update-clippy",
                "reviewers": ["@clippy-keeper"]
            }
        },
        "new_pr_labels": ["S-waiting-on-review"]
    }))
    .unwrap()
}

fn opened_event(body: Option<&str>) -> PullRequestEvent {
    serde_json::from_value(serde_json::json!({
        "action": "opened",
        "number": 1337,
        "pull_request": {
            "url": "https://api.github.com/repos/acme/widgets/pulls/1337",
            "body": body,
            "user": {"login": "newbie"},
            "assignees": [],
            "head": {"sha": "abc123"},
            "base": {
                "label": "acme:master",
                "repo": {"name": "widgets", "owner": {"login": "acme"}}
            }
        },
        "repository": {"full_name": "acme/widgets", "fork": false}
    }))
    .unwrap()
}

/// Compiler changes dominate; test-suite churn is ignored.
fn fixture_diff() -> String {
    let mut diff = String::new();
    for (path, additions) in [
        ("src/librustc_typeck/check.rs", 12),
        ("src/librustc_mir/build.rs", 8),
        ("src/doc/book/ch05.md", 3),
        ("src/test/ui/huge-test.rs", 200),
    ] {
        diff.push_str(&format!("diff --git a/{path} b/{path}\n"));
        diff.push_str(&format!("--- a/{path}\n+++ b/{path}\n"));
        for i in 0..additions {
            diff.push_str(&format!("+added line {i}\n"));
        }
    }
    diff
}

#[test]
fn heuristic_selection_from_most_modified_directory() {
    let event = opened_event(None);
    let config = repo_config();
    let mut rng = StdRng::seed_from_u64(7);

    let decision = build_decision(&event, &config, &fixture_diff(), false, &mut rng).unwrap();

    // src/librustc* folds to src/librustc, which maps to the compiler
    // group plus the `all` base pool.
    let assignee = decision.assignee.clone().unwrap();
    assert!(["alice", "bob", "carol"].contains(&assignee.as_str()));

    // Mention comment first (doc files matched), then the review notice.
    assert_eq!(decision.comments.len(), 2);
    assert!(decision.comments[0].contains("The documentation was modified."));
    assert!(decision.comments[0].contains("cc @docs-reviewer,@editor"));
    assert!(decision.comments[1].starts_with(&format!("r? @{}", assignee)));

    assert_eq!(decision.labels, vec!["S-waiting-on-review"]);
}

#[test]
fn replaying_the_same_inputs_is_deterministic() {
    let event = opened_event(None);
    let config = repo_config();
    let diff = fixture_diff();

    let first =
        build_decision(&event, &config, &diff, false, &mut StdRng::seed_from_u64(7)).unwrap();
    let second =
        build_decision(&event, &config, &diff, false, &mut StdRng::seed_from_u64(7)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn explicit_reviewer_wins_over_heuristics() {
    let event = opened_event(Some("Fixes #99.\n\nr? @carol"));
    let config = repo_config();
    let mut rng = StdRng::seed_from_u64(7);

    let decision = build_decision(&event, &config, &fixture_diff(), false, &mut rng).unwrap();

    assert_eq!(decision.assignee.as_deref(), Some("carol"));
    // Explicitly requested: no selection notice, only the mention comment.
    assert_eq!(decision.comments.len(), 1);
    assert!(decision.comments[0].starts_with("The documentation was modified."));
}

#[test]
fn command_mention_posts_trailer_with_head_sha() {
    let event = opened_event(None);
    let config = repo_config();
    let diff = "diff --git a/src/tools/clippy/lib.rs b/src/tools/clippy/lib.rs\n\
                +++ b/src/tools/clippy/lib.rs\n+fix\n";
    let mut rng = StdRng::seed_from_u64(7);

    let decision = build_decision(&event, &config, diff, false, &mut rng).unwrap();

    let mention = &decision.comments[0];
    assert!(mention.contains("cc @clippy-keeper"));
    assert!(mention.ends_with("@bot update-clippy abc123"));
}

#[test]
fn new_contributor_welcome_replaces_review_notice() {
    let event = opened_event(None);
    let config = repo_config();
    let mut rng = StdRng::seed_from_u64(7);

    let decision = build_decision(&event, &config, &fixture_diff(), true, &mut rng).unwrap();

    let welcome = decision
        .comments
        .iter()
        .find(|c| c.starts_with("Thanks for the pull request, and welcome!"))
        .expect("welcome comment");
    assert!(welcome.contains("(or someone else)"));
    assert!(!decision.comments.iter().any(|c| c.starts_with("r? @")));
}

#[test]
fn surprise_branch_and_submodule_warnings() {
    let mut event = opened_event(None);
    event.pull_request.base.label = "acme:release-1.0".to_string();
    let config = repo_config();
    let diff = format!(
        "{}diff --git a/vendor/lib b/vendor/lib\n-Subproject commit aaa\n+Subproject commit bbb\n",
        fixture_diff()
    );
    let mut rng = StdRng::seed_from_u64(7);

    let decision = build_decision(&event, &config, &diff, false, &mut rng).unwrap();

    let warning = decision.comments.last().unwrap();
    assert!(warning.starts_with(":warning: **Warning** :warning:"));
    assert!(warning.contains("but this one is against release-1.0"));
    assert!(warning.contains("These commits modify **submodules**."));
}
