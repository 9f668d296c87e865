//! Commit graph model and branch path reconstruction.
//!
//! Commits form a DAG linked by parent ids. The graph here is a flat,
//! index-based view over parallel id/parent columns: reconstruction walks
//! first-parent chains through it to recover the distinct lines of
//! development a repository's history contains.
//!
//! Every walk is bounded by the snapshot: a parent id that is not present
//! locally terminates the walk. That terminator covers both a true history
//! root and a window that cut ancestry off; [`Boundary`] records which.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::commit::{Commit, CommitId};
use crate::error::{Error, Result};
use crate::snapshot::RefSet;

/// O(1) lookup structure over parallel commit-id / parent-list columns.
///
/// Parent ids that don't correspond to any commit in the snapshot are an
/// expected boundary condition, never an error.
#[derive(Debug, Clone, Default)]
pub struct CommitGraph {
    ids: Vec<CommitId>,
    parents: Vec<Vec<CommitId>>,
    index: HashMap<CommitId, usize>,
}

impl CommitGraph {
    /// Build a graph from parallel columns, most recent commit first.
    ///
    /// # Errors
    /// Returns [`Error::MismatchedColumns`] if the columns differ in length.
    pub fn new(ids: Vec<CommitId>, parents: Vec<Vec<CommitId>>) -> Result<Self> {
        if ids.len() != parents.len() {
            return Err(Error::MismatchedColumns {
                ids: ids.len(),
                parents: parents.len(),
            });
        }

        let index = ids
            .iter()
            .enumerate()
            .map(|(position, id)| (id.clone(), position))
            .collect();

        Ok(Self {
            ids,
            parents,
            index,
        })
    }

    /// Build a graph from commits; the columns are derived together so they
    /// cannot disagree.
    #[must_use]
    pub fn from_commits(commits: &[Commit]) -> Self {
        let ids: Vec<CommitId> = commits.iter().map(|c| c.id.clone()).collect();
        let parents: Vec<Vec<CommitId>> = commits.iter().map(|c| c.parent_ids.clone()).collect();
        let index = ids
            .iter()
            .enumerate()
            .map(|(position, id)| (id.clone(), position))
            .collect();

        Self {
            ids,
            parents,
            index,
        }
    }

    /// Number of commits in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the graph holds no commits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether a commit id is present in the snapshot.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a commit in the input sequence.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Parent ids of a commit, or `None` if the id is outside the snapshot.
    #[must_use]
    pub fn parents_of(&self, id: &str) -> Option<&[CommitId]> {
        self.index_of(id).map(|i| self.parents[i].as_slice())
    }

    /// Mainline parent of a commit, if it has one.
    #[must_use]
    pub fn first_parent(&self, id: &str) -> Option<&str> {
        self.parents_of(id)
            .and_then(|parents| parents.first())
            .map(String::as_str)
    }

    /// All commit ids, in input order.
    #[must_use]
    pub fn ids(&self) -> &[CommitId] {
        &self.ids
    }

    /// All parent lists, in input order.
    #[must_use]
    pub fn parent_lists(&self) -> &[Vec<CommitId>] {
        &self.parents
    }
}

/// The two attributable parents of a merge commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeParents {
    /// The branch that was merged into (first parent).
    pub mainline: CommitId,

    /// The branch that was merged in (second parent).
    pub merged: CommitId,
}

/// Find the merge commits among the parent lists and return their parents.
///
/// A commit is a merge commit iff it has more than one parent. Input order
/// is preserved; an empty input yields an empty result.
#[must_use]
pub fn identify_merge_parents(parent_lists: &[Vec<CommitId>]) -> Vec<MergeParents> {
    parent_lists
        .iter()
        .filter(|parents| parents.len() > 1)
        .map(|parents| MergeParents {
            mainline: parents[0].clone(),
            merged: parents[1].clone(),
        })
        .collect()
}

/// How a first-parent walk back through history ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Boundary {
    /// The walk reached a root commit (empty parent list).
    Root,

    /// The walk reached a parent that lies outside the snapshot window.
    /// Indistinguishable from a root in the raw data; the missing parent id
    /// is kept so callers can log or refetch.
    Truncated {
        /// The first parent id that was not found locally.
        parent_id: CommitId,
    },
}

/// One reconstructed line of development.
///
/// Paths are ordered oldest-first and contain only ids present in the
/// snapshot. Distinct paths may share commits; overlap at fork and merge
/// points is expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchPath {
    /// Commit ids, oldest first.
    pub ids: Vec<CommitId>,

    /// What ended the walk back through history.
    pub boundary: Boundary,
}

/// Reconstruct the branch set of a snapshot.
///
/// Three sources contribute paths, in order:
/// 1. each merge commit yields two paths, one per parent, walking the
///    first-parent chain from the merge commit through that parent;
/// 2. each ref whose target is no commit's parent marks an unmerged branch
///    tip and is walked the same way;
/// 3. if neither produced anything, a single fallback path covers the
///    history so the output is never empty while commits exist.
///
/// Roughly `git log --reverse --first-parent <id>` per discovered tip.
#[must_use]
pub fn branch_paths(graph: &CommitGraph, refs: &RefSet) -> Vec<BranchPath> {
    let mut paths = Vec::new();

    for pair in identify_merge_parents(graph.parent_lists()) {
        let Some(merge_commit) = find_merge_commit(graph, &pair) else {
            continue;
        };
        for side in [&pair.mainline, &pair.merged] {
            paths.push(path_through_parent(graph, merge_commit, side));
        }
    }

    add_unmerged_branches(graph, refs, &mut paths);

    if paths.is_empty() {
        if let Some(start) = graph.ids().last() {
            let (chain, boundary) = walk_first_parents(graph, start);
            paths.push(into_path(chain, boundary));
        }
    }

    paths
}

/// Locate the commit whose parent list starts with this exact pair.
///
/// Prefix match rather than full equality so an octopus merge still anchors
/// its paths.
fn find_merge_commit<'a>(graph: &'a CommitGraph, pair: &MergeParents) -> Option<&'a str> {
    graph
        .parent_lists()
        .iter()
        .position(|parents| {
            parents.len() > 1 && parents[0] == pair.mainline && parents[1] == pair.merged
        })
        .map(|i| graph.ids()[i].as_str())
}

/// Build the path seeded by a merge commit and continued through one of its
/// parents.
fn path_through_parent(graph: &CommitGraph, merge_commit: &str, parent: &str) -> BranchPath {
    if !graph.contains(parent) {
        return BranchPath {
            ids: vec![merge_commit.to_string()],
            boundary: Boundary::Truncated {
                parent_id: parent.to_string(),
            },
        };
    }

    let (chain, boundary) = walk_first_parents(graph, parent);
    let mut ids = vec![merge_commit.to_string()];
    ids.extend(chain);
    ids.reverse();
    BranchPath { ids, boundary }
}

/// Unmerged branches have no merge commit to find them by, but they can't
/// exist without a ref: any ref target that never appears as a parent is an
/// unmerged tip.
fn add_unmerged_branches(graph: &CommitGraph, refs: &RefSet, paths: &mut Vec<BranchPath>) {
    let parent_pool: HashSet<&str> = graph
        .parent_lists()
        .iter()
        .flatten()
        .map(String::as_str)
        .collect();

    for target in refs.values() {
        if parent_pool.contains(target.as_str()) {
            continue;
        }
        // A ref pointing outside the window contributes nothing.
        if !graph.contains(target) {
            continue;
        }
        let (chain, boundary) = walk_first_parents(graph, target);
        paths.push(into_path(chain, boundary));
    }
}

/// Follow first parents from `start` (inclusive, must be in the graph)
/// while they stay inside the snapshot. Returns the visited ids
/// newest-first and the boundary that stopped the walk.
fn walk_first_parents(graph: &CommitGraph, start: &str) -> (Vec<CommitId>, Boundary) {
    let mut chain = Vec::new();
    let mut current = start;

    loop {
        chain.push(current.to_string());
        match graph.parents_of(current).and_then(|parents| parents.first()) {
            None => return (chain, Boundary::Root),
            Some(parent) if graph.contains(parent) => current = parent,
            Some(parent) => {
                return (
                    chain,
                    Boundary::Truncated {
                        parent_id: parent.clone(),
                    },
                );
            }
        }
    }
}

fn into_path(mut chain: Vec<CommitId>, boundary: Boundary) -> BranchPath {
    chain.reverse();
    BranchPath {
        ids: chain,
        boundary,
    }
}
