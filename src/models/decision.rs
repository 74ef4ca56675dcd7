//! The per-PR action plan.

/// Everything the workflow decided to do for one opened pull request.
///
/// Built purely from the payload, configuration, diff text and the
/// new-contributor flag, then executed as a strict sequence of gateway
/// calls. Produced and consumed within a single event; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decision {
    /// Reviewer to assign, if one was requested or selected.
    pub assignee: Option<String>,

    /// Comment bodies in posting order: mention comment, welcome or
    /// review notice, warning summary.
    pub comments: Vec<String>,

    /// Labels to apply to the new PR.
    pub labels: Vec<String>,
}

impl Decision {
    /// True when executing this decision performs no gateway calls.
    pub fn is_empty(&self) -> bool {
        self.assignee.is_none() && self.comments.is_empty() && self.labels.is_empty()
    }
}
