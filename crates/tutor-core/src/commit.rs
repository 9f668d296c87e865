//! Commit and tag data model.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An opaque commit identifier.
pub type CommitId = String;

/// A git commit as seen by the analysis engine.
///
/// Identity is the commit id alone: two `Commit`s with the same id compare
/// equal regardless of the metadata a provider attached to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Commit id.
    pub id: CommitId,

    /// Parent commit ids; index 0 is the mainline parent. Empty for a root.
    #[serde(default)]
    pub parent_ids: Vec<CommitId>,

    /// Commit creation time, when the provider knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Author name, used only for report display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Commit message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Commit {
    /// Create a commit with just an id and its parents.
    #[must_use]
    pub fn new(id: impl Into<CommitId>, parent_ids: Vec<CommitId>) -> Self {
        Self {
            id: id.into(),
            parent_ids,
            created_at: None,
            author: None,
            message: None,
        }
    }

    /// Whether this is a merge commit. Only a merge commit has more than
    /// one parent.
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }

    /// The mainline parent id, if any.
    #[must_use]
    pub fn first_parent(&self) -> Option<&str> {
        self.parent_ids.first().map(String::as_str)
    }

    /// Abbreviated id for display.
    #[must_use]
    pub fn short_id(&self) -> &str {
        self.id.get(..10).unwrap_or(&self.id)
    }
}

impl PartialEq for Commit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Commit {}

impl Hash for Commit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A tag is a named pointer to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// The name of the tag.
    pub name: String,

    /// The id of the commit the tag points to.
    pub commit_id: CommitId,
}

impl Tag {
    /// Create a tag.
    #[must_use]
    pub fn new(name: impl Into<String>, commit_id: impl Into<CommitId>) -> Self {
        Self {
            name: name.into(),
            commit_id: commit_id.into(),
        }
    }
}

/// Find a commit in a list by its id.
#[must_use]
pub fn find_commit<'a>(id: &str, commits: &'a [Commit]) -> Option<&'a Commit> {
    commits.iter().find(|c| c.id == id)
}
