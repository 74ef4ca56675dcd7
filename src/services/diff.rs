//! Diff Attributor and Mention Extractor.
//!
//! Both scan the raw unified diff line by line; nothing here is a general
//! diff parser. Only `diff --git` file headers and addition lines matter.
//! Attribution tallies added lines per (folded) top-two-segment directory;
//! mention extraction matches full file paths against configured patterns.

use crate::models::{MentionRule, RepoConfig};

const FILE_HEADER: &str = "diff --git ";
const NEW_PATH_MARKER: &str = " b/";
const SUBMODULE_MARKER: &str = "+Subproject commit ";

/// Extract the post-image path from a `diff --git a/... b/...` header.
fn header_path(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(FILE_HEADER)?;
    let idx = rest.find(NEW_PATH_MARKER)?;
    Some(&rest[idx + NEW_PATH_MARKER.len()..])
}

/// Reduce a file path to the directory it is attributed to, or `None` when
/// the file does not count toward any directory.
///
/// The first two path segments form the candidate; a path with fewer than
/// two segments (a file at the repository root) attributes to nothing.
/// Configured prefixes fold near-identical subtrees into one unit, and
/// excluded directories are dropped so that e.g. test-only changes never
/// drive reviewer choice.
fn candidate_dir(path: &str, config: &RepoConfig) -> Option<String> {
    let mut segments = path.split('/');
    let first = segments.next()?;
    let second = segments.next()?;
    let mut dir = format!("{}/{}", first, second);

    for prefix in &config.collapse_prefixes {
        if dir.starts_with(prefix.as_str()) {
            dir = prefix.clone();
            break;
        }
    }

    if config.excluded_dirs.iter().any(|d| *d == dir) {
        return None;
    }
    Some(dir)
}

/// Find the directory with the most added lines in `diff`.
///
/// Counts are kept in first-seen order and a later directory must strictly
/// exceed the running maximum, so ties resolve to the directory that
/// appeared first in the diff. Returns `None` when no tracked directory
/// accumulated any additions. Lines before the first file header attribute
/// to nothing.
pub fn attribute_diff(diff: &str, config: &RepoConfig) -> Option<String> {
    if config.dirs.is_empty() {
        return None;
    }

    // (directory, added lines) in first-seen order.
    let mut counts: Vec<(String, u64)> = Vec::new();
    let mut current: Option<usize> = None;

    for line in diff.lines() {
        if line.starts_with(FILE_HEADER) {
            current = header_path(line)
                .and_then(|path| candidate_dir(path, config))
                .map(|dir| match counts.iter().position(|(d, _)| *d == dir) {
                    Some(idx) => idx,
                    None => {
                        counts.push((dir, 0));
                        counts.len() - 1
                    }
                });
            continue;
        }

        if let Some(idx) = current {
            if line.starts_with('+') && !line.starts_with("+++") {
                counts[idx].1 += 1;
            }
        }
    }

    let mut most_changes = 0;
    let mut most_changed = None;
    for (dir, changes) in counts {
        if changes > most_changes {
            most_changes = changes;
            most_changed = Some(dir);
        }
    }
    most_changed
}

/// Collect the mention rules whose path pattern matches a file in `diff`.
///
/// A pattern matches as a path prefix, or as a suffix when it names a
/// `.rs` file. Each pattern is recorded at most once, in the order its
/// first matching file appears in the diff.
pub fn extract_mentions<'a>(diff: &str, config: &'a RepoConfig) -> Vec<&'a MentionRule> {
    let mut matched_keys: Vec<&str> = Vec::new();

    for line in diff.lines() {
        let Some(path) = header_path(line) else {
            continue;
        };
        if path.is_empty() {
            continue;
        }

        for entry in config.mentions.keys() {
            let entry = entry.as_str();
            if matched_keys.contains(&entry) {
                continue;
            }
            let suffix_match = entry.ends_with(".rs") && path.ends_with(entry);
            if path.starts_with(entry) || suffix_match {
                matched_keys.push(entry);
            }
        }
    }

    matched_keys
        .into_iter()
        .map(|key| &config.mentions[key])
        .collect()
}

/// True when the diff touches a git submodule pointer.
pub fn modifies_submodule(diff: &str) -> bool {
    diff.lines().any(|line| line.starts_with(SUBMODULE_MARKER))
}
