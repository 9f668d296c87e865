//! Immutable history snapshots supplied by providers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commit::{Commit, CommitId, Tag};
use crate::graph::CommitGraph;
use crate::timeline::Event;

/// Named refs. Ordered by name so reconstruction output is deterministic.
pub type RefSet = BTreeMap<String, CommitId>;

/// Bounds and branch filter for a history fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Earliest commit time to include.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,

    /// Latest commit time to include.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,

    /// Restrict the commit listing to one branch; `None` means all refs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl Window {
    /// A window over everything a provider can see.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            since: None,
            until: None,
            branch: None,
        }
    }

    /// The same bounds, narrowed to a single branch.
    #[must_use]
    pub fn for_branch(&self, branch: impl Into<String>) -> Self {
        Self {
            since: self.since,
            until: self.until,
            branch: Some(branch.into()),
        }
    }
}

/// Everything the engine needs to know about a repository, fetched once
/// and read-only for the duration of an analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Commits, most recent first.
    pub commits: Vec<Commit>,

    /// Branch refs.
    #[serde(default)]
    pub refs: RefSet,

    /// Current tags (duplicates allowed).
    #[serde(default)]
    pub tags: Vec<Tag>,

    /// Ref-lifecycle events, as supplied by the provider.
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Snapshot {
    /// Build the lookup graph over this snapshot's commits.
    #[must_use]
    pub fn graph(&self) -> CommitGraph {
        CommitGraph::from_commits(&self.commits)
    }
}
