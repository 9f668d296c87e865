//! GitLab API domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit as reported by the GitLab commits API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabCommit {
    /// Full commit id.
    pub id: String,

    /// Parent commit ids, mainline parent first.
    pub parent_ids: Vec<String>,

    /// Commit creation time.
    pub created_at: DateTime<Utc>,

    /// Author name.
    pub author_name: Option<String>,

    /// Full commit message.
    pub message: Option<String>,
}

/// A branch: name plus the commit it points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabBranch {
    /// Branch name.
    pub name: String,

    /// Id of the branch tip commit.
    pub commit_id: String,
}

/// A tag: name plus the commit it points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabTag {
    /// Tag name.
    pub name: String,

    /// Id of the tagged commit.
    pub commit_id: String,
}

/// What a push event did to its ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushAction {
    /// A ref was created.
    PushedNew,
    /// An existing ref was moved.
    PushedTo,
    /// A ref was deleted.
    Deleted,
    /// Event kinds this client doesn't interpret.
    Other,
}

impl PushAction {
    /// Parse GitLab's `action_name` field.
    #[must_use]
    pub fn parse(action_name: &str) -> Self {
        match action_name {
            "pushed new" => Self::PushedNew,
            "pushed to" => Self::PushedTo,
            "deleted" => Self::Deleted,
            _ => Self::Other,
        }
    }
}

/// A ref-lifecycle event from the project event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabEvent {
    /// When the event happened.
    pub date: DateTime<Utc>,

    /// What happened to the ref.
    pub action: PushAction,

    /// The kind of ref, as reported ("branch", "tag").
    pub ref_type: String,

    /// The ref's name.
    pub ref_name: String,

    /// The commit the ref pointed to - the target of a push, the old
    /// target of a deletion.
    pub commit_id: String,
}
