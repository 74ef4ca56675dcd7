//! Reviewer Selector.
//!
//! Two ways to end up with a reviewer: the author asked for one in the PR
//! description (`r? @name`), or we pick one from the configured groups,
//! biased toward whichever directory the diff touched most.
//!
//! Group expansion is an explicit work-list with a guard set rather than
//! recursion, so a self-referential group chain surfaces as a
//! configuration error instead of a stack overflow or silent truncation.

use crate::error::AppError;
use crate::models::RepoConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Matches `r? @name` (case-insensitive marker, optional `:`/`-`/space
/// separators) anywhere in the PR description.
fn reviewer_re() -> &'static Regex {
    static REVIEWER_RE: OnceLock<Regex> = OnceLock::new();
    REVIEWER_RE.get_or_init(|| {
        Regex::new(r"\b[rR]\?[:\- ]*@([A-Za-z0-9\-]+)").expect("reviewer pattern is valid")
    })
}

/// Return the explicitly requested reviewer from a PR description, if any.
pub fn find_reviewer(body: Option<&str>) -> Option<String> {
    let body = body?;
    reviewer_re()
        .captures(body)
        .map(|captures| captures[1].to_string())
}

/// Pick a reviewer for a new PR, excluding its author.
///
/// Candidates start from the `all` group, extended with the winning
/// directory's aliases when that directory has a mapping; an empty pool
/// falls back to the `core` group. Alias tokens starting with `@` are
/// literal usernames; any other token naming a known group is expanded in
/// place. Re-expanding a group already seen (the set is seeded with `all`)
/// is a [`AppError::ConfigConflict`]. Tokens that are neither are skipped.
///
/// Returns `None` when nobody is eligible after excluding the author.
pub fn choose_reviewer(
    winning_dir: Option<&str>,
    config: &RepoConfig,
    exclude: &str,
    rng: &mut impl Rng,
) -> Result<Option<String>, AppError> {
    let all = config
        .groups
        .get("all")
        .ok_or_else(|| AppError::config_conflict("group all is not defined"))?;

    let mut potential: Vec<String> = all.clone();
    if let Some(dir) = winning_dir {
        if let Some(aliases) = config.dirs.get(dir) {
            potential.extend(aliases.iter().cloned());
        }
    }
    if potential.is_empty() {
        potential = config.groups.get("core").cloned().unwrap_or_default();
    }

    let mut reviewers: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::from(["all".to_string()]);

    while let Some(token) = potential.pop() {
        if let Some(name) = token.strip_prefix('@') {
            reviewers.push(name.to_string());
        } else if let Some(members) = config.groups.get(&token) {
            if !seen.insert(token.clone()) {
                return Err(AppError::config_conflict(format!(
                    "group {} refers to itself",
                    token
                )));
            }
            potential.extend(members.iter().cloned());
        }
        // Anything else is neither a username nor a known group; skip it.
    }

    reviewers.retain(|reviewer| reviewer != exclude);

    Ok(reviewers.choose(rng).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(json: serde_json::Value) -> RepoConfig {
        serde_json::from_value(json).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_find_reviewer_variants() {
        assert_eq!(find_reviewer(Some("r? @carol")).as_deref(), Some("carol"));
        assert_eq!(find_reviewer(Some("R?: @carol")).as_deref(), Some("carol"));
        assert_eq!(
            find_reviewer(Some("fixes #1\n\nr?- @some-one please")).as_deref(),
            Some("some-one")
        );
        assert_eq!(find_reviewer(Some("no request here")), None);
        assert_eq!(find_reviewer(None), None);
    }

    #[test]
    fn test_author_excluded_from_pool() {
        let config = config(serde_json::json!({"groups": {"all": ["@a", "@b"]}}));
        let reviewer = choose_reviewer(None, &config, "a", &mut rng()).unwrap();
        assert_eq!(reviewer.as_deref(), Some("b"));
    }

    #[test]
    fn test_author_only_pool_yields_none() {
        let config = config(serde_json::json!({"groups": {"all": ["@solo"]}}));
        let reviewer = choose_reviewer(None, &config, "solo", &mut rng()).unwrap();
        assert_eq!(reviewer, None);
    }

    #[test]
    fn test_nested_groups_expand_to_usernames() {
        let config = config(serde_json::json!({
            "groups": {
                "all": ["team"],
                "team": ["@x", "inner"],
                "inner": ["@y"]
            }
        }));
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let reviewer = choose_reviewer(None, &config, "nobody", &mut rng)
                .unwrap()
                .unwrap();
            assert!(reviewer == "x" || reviewer == "y");
        }
    }

    #[test]
    fn test_cycle_is_a_config_error() {
        let config = config(serde_json::json!({
            "groups": {
                "all": ["team"],
                "team": ["other"],
                "other": ["team"]
            }
        }));
        assert!(matches!(
            choose_reviewer(None, &config, "nobody", &mut rng()),
            Err(AppError::ConfigConflict { .. })
        ));
    }

    #[test]
    fn test_group_referencing_all_is_a_cycle() {
        let config = config(serde_json::json!({
            "groups": {"all": ["team"], "team": ["all"]}
        }));
        assert!(matches!(
            choose_reviewer(None, &config, "nobody", &mut rng()),
            Err(AppError::ConfigConflict { .. })
        ));
    }

    #[test]
    fn test_missing_all_group_is_a_config_error() {
        let config = config(serde_json::json!({"groups": {"core": ["@a"]}}));
        assert!(matches!(
            choose_reviewer(None, &config, "nobody", &mut rng()),
            Err(AppError::ConfigConflict { .. })
        ));
    }

    #[test]
    fn test_winning_directory_extends_pool() {
        let config = config(serde_json::json!({
            "dirs": {"src/doc": ["@docs"]},
            "groups": {"all": []}
        }));
        let reviewer = choose_reviewer(Some("src/doc"), &config, "nobody", &mut rng()).unwrap();
        assert_eq!(reviewer.as_deref(), Some("docs"));
    }

    #[test]
    fn test_unmapped_directory_falls_back_to_core() {
        let config = config(serde_json::json!({
            "groups": {"all": [], "core": ["@keeper"]}
        }));
        let reviewer = choose_reviewer(Some("src/other"), &config, "nobody", &mut rng()).unwrap();
        assert_eq!(reviewer.as_deref(), Some("keeper"));
    }

    #[test]
    fn test_empty_pool_without_core_yields_none() {
        let config = config(serde_json::json!({"groups": {"all": []}}));
        let reviewer = choose_reviewer(None, &config, "nobody", &mut rng()).unwrap();
        assert_eq!(reviewer, None);
    }

    #[test]
    fn test_unknown_tokens_skipped() {
        let config = config(serde_json::json!({
            "groups": {"all": ["not-a-group", "@real"]}
        }));
        let reviewer = choose_reviewer(None, &config, "nobody", &mut rng()).unwrap();
        assert_eq!(reviewer.as_deref(), Some("real"));
    }

    #[test]
    fn test_selection_deterministic_under_fixed_seed() {
        let config = config(serde_json::json!({
            "groups": {"all": ["@a", "@b", "@c", "@d"]}
        }));
        let first = choose_reviewer(None, &config, "nobody", &mut rng()).unwrap();
        let second = choose_reviewer(None, &config, "nobody", &mut rng()).unwrap();
        assert_eq!(first, second);
    }
}
