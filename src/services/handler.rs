//! Decision Workflow.
//!
//! One pass per delivered event: dispatch on the event kind, and for a
//! freshly opened pull request build a [`Decision`] (assignee, comments,
//! labels) purely from the payload, the repository configuration, the
//! diff text and the new-contributor flag, then execute it as a strict
//! sequence of gateway calls.

use crate::error::AppError;
use crate::models::{Decision, MentionRule, PullRequestEvent, RepoConfig};
use crate::services::diff;
use crate::services::github_client::GitHubClient;
use crate::services::reviewer::{choose_reviewer, find_reviewer};
use crate::services::ConfigStore;
use rand::Rng;

/// Acknowledgement for a `ping` event.
pub const PING_ACK: &str = "Ping received! The webhook is configured correctly!\n";

/// Acknowledgement for a processed `pull_request opened` event.
pub const OK_ACK: &str = "OK\n";

/// Acknowledgement for anything the bot does not handle.
pub const UNSUPPORTED_ACK: &str = "Unsupported webhook event.\n";

const SUBMODULE_WARNING: &str = "These commits modify **submodules**.";

/// Webhook event processor.
pub struct Handler {
    client: GitHubClient,
    store: ConfigStore,
}

impl Handler {
    pub fn new(client: GitHubClient, store: ConfigStore) -> Self {
        Self { client, store }
    }

    /// Process one delivered event, returning the plain-text acknowledgement.
    pub async fn run(
        &self,
        event_kind: &str,
        payload: &serde_json::Value,
    ) -> Result<String, AppError> {
        match event_kind {
            "ping" => Ok(PING_ACK.to_string()),
            "pull_request" => {
                let event: PullRequestEvent = serde_json::from_value(payload.clone())?;
                if event.action == "opened" {
                    self.new_pr(&event).await?;
                    Ok(OK_ACK.to_string())
                } else {
                    Ok(UNSUPPORTED_ACK.to_string())
                }
            }
            _ => Ok(UNSUPPORTED_ACK.to_string()),
        }
    }

    /// Handle a newly opened pull request end to end.
    async fn new_pr(&self, event: &PullRequestEvent) -> Result<(), AppError> {
        let config = self.store.load(&event.repository.full_name)?;
        let pr = &event.pull_request;
        let owner = &pr.base.repo.owner.login;
        let repo = &pr.base.repo.name;

        log::info!(
            "[webhook] pull request #{} opened in {} by {}",
            event.number,
            event.repository.full_name,
            pr.user.login
        );

        let diff = self.client.get_diff(&pr.url).await?;

        let new_contributor = if wants_contributor_check(event) {
            self.client
                .is_new_contributor(&pr.user.login, owner, repo)
                .await?
        } else {
            false
        };

        let decision = {
            let mut rng = rand::thread_rng();
            build_decision(event, &config, &diff, new_contributor, &mut rng)?
        };

        self.execute(owner, repo, event.number, &decision).await
    }

    /// Perform the decision's side effects in order: assignee, comments,
    /// labels. Each call is at-most-once; a failure aborts the rest.
    async fn execute(
        &self,
        owner: &str,
        repo: &str,
        issue: u64,
        decision: &Decision,
    ) -> Result<(), AppError> {
        if let Some(assignee) = &decision.assignee {
            log::info!("[webhook] assigning {} to {}/{}#{}", assignee, owner, repo, issue);
            self.client.set_assignee(owner, repo, issue, assignee).await?;
        }

        for comment in &decision.comments {
            self.client.post_comment(owner, repo, issue, comment).await?;
        }

        if !decision.labels.is_empty() {
            self.client
                .add_labels(owner, repo, issue, &decision.labels)
                .await?;
        }

        Ok(())
    }
}

/// Whether the new-contributor commit search should run at all.
///
/// The search endpoint reports zero commits for every user in a fork, so
/// fork PRs are never treated as new contributors. The check is also
/// skipped when assignees exist, since no welcome would be posted anyway.
fn wants_contributor_check(event: &PullRequestEvent) -> bool {
    event.pull_request.assignees.is_empty() && !event.repository.fork
}

/// Build the action plan for a newly opened pull request.
///
/// Reviewer selection and the welcome/review notice only happen when the
/// PR has no assignees; an existing human assignment is never overridden.
/// Warnings and labels apply regardless.
pub fn build_decision(
    event: &PullRequestEvent,
    config: &RepoConfig,
    diff: &str,
    new_contributor: bool,
    rng: &mut impl Rng,
) -> Result<Decision, AppError> {
    let pr = &event.pull_request;
    let author = &pr.user.login;
    let mut decision = Decision::default();

    if pr.assignees.is_empty() {
        let explicit = find_reviewer(pr.body.as_deref());
        // A selection notice is only owed when we picked the reviewer
        // ourselves; an explicit r? already told the author who it is.
        let heuristic = explicit.is_none();
        let reviewer = match explicit {
            Some(requested) => Some(requested),
            None => {
                let winning_dir = diff::attribute_diff(diff, config);
                choose_reviewer(winning_dir.as_deref(), config, author, rng)?
            }
        };

        let mentions = diff::extract_mentions(diff, config);
        if let Some(comment) = mention_comment(&mentions, reviewer.as_deref(), &pr.head.sha) {
            decision.comments.push(comment);
        }

        if new_contributor {
            decision.comments.push(welcome_msg(
                reviewer.as_deref(),
                config,
                &pr.base.repo.owner.login,
                &pr.base.repo.name,
            ));
        } else if heuristic {
            decision
                .comments
                .push(review_msg(reviewer.as_deref(), author));
        }

        decision.assignee = reviewer;
    }

    let mut warnings = Vec::new();
    let actual_branch = pr.base.branch();
    if actual_branch != config.expected_branch {
        warnings.push(format!(
            "Pull requests are usually filed against the {} branch for this repo, \
             but this one is against {}. Please double check that you specified \
             the right target!",
            config.expected_branch, actual_branch
        ));
    }
    if diff::modifies_submodule(diff) {
        warnings.push(SUBMODULE_WARNING.to_string());
    }
    if !warnings.is_empty() {
        let bullets: Vec<String> = warnings.iter().map(|w| format!("* {}", w)).collect();
        decision.comments.push(format!(
            ":warning: **Warning** :warning:\n\n{}",
            bullets.join("\n")
        ));
    }

    decision.labels = config.new_pr_labels.clone();

    Ok(decision)
}

/// Compose the single aggregated mention comment, or `None` when no
/// mention rule matched.
///
/// Per rule: its optional message, then a `cc` line excluding the chosen
/// reviewer (they are already assigned). One `"<command> <head-sha>"`
/// trailer per distinct command, in encounter order.
fn mention_comment(
    mentions: &[&MentionRule],
    reviewer: Option<&str>,
    head_sha: &str,
) -> Option<String> {
    if mentions.is_empty() {
        return None;
    }

    let mut message = String::new();
    let mut commands: Vec<&str> = Vec::new();

    for rule in mentions {
        let cc: Vec<&str> = rule
            .reviewers
            .iter()
            .map(String::as_str)
            .filter(|name| Some(name.trim_start_matches('@')) != reviewer)
            .collect();

        if !message.is_empty() {
            message.push_str("\n\n");
        }
        if let Some(text) = &rule.message {
            message.push_str(text);
            message.push_str("\n\n");
        }
        message.push_str("cc ");
        message.push_str(&cc.join(","));

        if let Some(command) = &rule.command {
            if !commands.contains(&command.as_str()) {
                commands.push(command);
            }
        }
    }

    for command in commands {
        message.push_str(&format!("\n\n{} {}", command, head_sha));
    }

    Some(message)
}

/// Greeting for a first-time contributor.
fn welcome_msg(reviewer: Option<&str>, config: &RepoConfig, owner: &str, repo: &str) -> String {
    let from = match reviewer {
        Some(name) => format!("@{} (or someone else)", name),
        None => "a maintainer (NB. this repo may be misconfigured)".to_string(),
    };
    let link = config.contributing.clone().unwrap_or_else(|| {
        format!(
            "https://github.com/{}/{}/blob/{}/CONTRIBUTING.md",
            owner, repo, config.expected_branch
        )
    });

    format!(
        "Thanks for the pull request, and welcome! The team is excited to review \
         your changes, and you should hear from {} soon.\n\n\
         If any changes to this PR are deemed necessary, please add them as extra \
         commits. This ensures that the reviewer can see what has changed since \
         they last reviewed the code. Due to the way GitHub handles out-of-date \
         commits, this should also make it reasonably obvious what issues have or \
         haven't been addressed. Large or tricky changes may require several \
         passes of review and changes.\n\n\
         Please see [the contribution instructions]({}) for more information.\n",
        from, link
    )
}

/// Notice posted when the bot picked (or failed to pick) a reviewer itself.
fn review_msg(reviewer: Option<&str>, author: &str) -> String {
    match reviewer {
        Some(name) => format!(
            "r? @{}\n\n(pr-butler has picked a reviewer for you, use r? to override)",
            name
        ),
        None => format!("@{}: no appropriate reviewer found, use r? to override", author),
    }
}
