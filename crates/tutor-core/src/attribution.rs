//! Commit attribution: divergence points and merge points.
//!
//! Given newest-first commit listings of a base branch and a feature
//! branch over the same window, these operations decide which commit
//! started the feature branch and which commit (if any) integrated it
//! back - the two facts grading needs to credit work to a branch.
//!
//! Both listings must share their oldest commit; the window convention is
//! one extra commit past the true branching point so a common ancestor is
//! always present.

use std::collections::HashSet;

use crate::commit::{Commit, CommitId, find_commit};
use crate::error::{Error, Result};

/// Find the first commit on a feature branch.
///
/// Determines the branching point from parent links alone, covering three
/// integration states:
/// - unmerged branch: the newest feature commit never reached base; the
///   first feature commit is the newest one whose mainline parent is in
///   base;
/// - merged branch: a merge commit records the integration; the first
///   feature commit is found by chasing shared parents down base's
///   first-parent chain;
/// - fast-forward: no merge commit exists; the second-oldest feature
///   entry is the first feature commit (the window carries one extra
///   commit below the branching point).
///
/// Returns `Ok(None)` when there are no feature commits in the window -
/// nothing to attribute, not an error.
///
/// # Errors
/// [`Error::WindowMismatch`] if the two listings don't end on the same
/// oldest commit; [`Error::DisconnectedHistory`] if an unmerged feature
/// has no parent link into base; [`Error::WindowTooNarrow`] if the
/// fast-forward case lacks its boundary commit.
pub fn first_feature_commit<'a>(
    base: &[Commit],
    feature: &'a [Commit],
) -> Result<Option<&'a Commit>> {
    // No feature branch commits in the window.
    let Some(feature_oldest) = feature.last() else {
        return Ok(None);
    };

    // To be certain the first feature commit is in the window, both lists
    // must bottom out on a common commit.
    let base_oldest = base.last().ok_or_else(|| Error::WindowMismatch {
        base_oldest: "(no base commits)".into(),
        feature_oldest: feature_oldest.id.clone(),
    })?;
    if base_oldest != feature_oldest {
        return Err(Error::WindowMismatch {
            base_oldest: base_oldest.id.clone(),
            feature_oldest: feature_oldest.id.clone(),
        });
    }

    // Unmerged branch: the tip never made it into base. The newest feature
    // commit whose mainline parent is in base is the branching point.
    let tip = &feature[0];
    if !base.contains(tip) {
        for commit in feature {
            if commit
                .first_parent()
                .is_some_and(|parent| base.iter().any(|b| b.id == parent))
            {
                return Ok(Some(commit));
            }
        }
        return Err(Error::DisconnectedHistory {
            tip: tip.id.clone(),
        });
    }

    // Merged branch: look for the feature commit whose mainline parent
    // sits on base's first-parent chain.
    for commit in feature {
        if has_branching_parent(commit, base) {
            return Ok(Some(commit));
        }
    }

    // Neither unmerged nor merged with a merge commit: the integration was
    // a fast-forward, and the second-oldest feature entry is the first
    // commit on the branch.
    feature
        .len()
        .checked_sub(2)
        .and_then(|i| feature.get(i))
        .map(Some)
        .ok_or(Error::WindowTooNarrow {
            len: feature.len(),
        })
}

/// Whether this feature commit's mainline parent appears among the parents
/// of a commit on base's first-parent chain.
///
/// The chain is walked from the most recent base commit; first parents
/// always point along the branch being merged into.
fn has_branching_parent(feature_commit: &Commit, base: &[Commit]) -> bool {
    let Some(feature_parent) = feature_commit.first_parent() else {
        return false;
    };

    let mut base_commit = base.first();
    while let Some(current) = base_commit {
        if current.parent_ids.iter().any(|p| p == feature_parent) && current != feature_commit {
            return true;
        }
        base_commit = current
            .first_parent()
            .and_then(|next| find_commit(next, base));
    }

    false
}

/// Fix up an initial divergence guess against the known merge commits.
///
/// Commits up to and including a merge commit in a feature branch's
/// history cannot be the first commit on that branch: scanning tip-ward,
/// the newest merge commit other than the tip bounds the answer, and the
/// commit chronologically succeeding it wins over the original guess.
#[must_use]
pub fn refine_first_feature_commit<'a>(
    feature: &'a [Commit],
    initial_guess: &'a Commit,
    merge_commits: &HashSet<CommitId>,
) -> &'a Commit {
    let Some(tip) = feature.first() else {
        return initial_guess;
    };

    // Chronologically succeeding, not next in the list - the list is
    // ordered newest to oldest.
    let mut succeeding: Option<&Commit> = None;
    for commit in feature {
        if merge_commits.contains(&commit.id) && commit != tip {
            return succeeding.unwrap_or(commit);
        }
        succeeding = Some(commit);
    }

    initial_guess
}

/// Find the commit that integrated a feature branch into base.
///
/// Scans the base commits more recent than the feature tip for a merge
/// commit whose second parent is the tip. If the tip is in base but no
/// such merge commit exists, the integration was a fast-forward and the
/// tip itself is the merge point.
///
/// Returns `None` when the branch was never merged (tip absent from base,
/// or no base commits at all) - a normal outcome, not an error.
#[must_use]
pub fn merge_point<'a>(feature_tip: &Commit, base: &'a [Commit]) -> Option<&'a Commit> {
    let tip_index = base.iter().position(|commit| commit == feature_tip)?;

    // Search the more recent commits oldest-to-newest for an explicit
    // merge of the tip.
    for commit in base[..tip_index].iter().rev() {
        if commit.parent_ids.len() > 1
            && commit.parent_ids.get(1).map(String::as_str) == Some(feature_tip.id.as_str())
        {
            return Some(commit);
        }
    }

    // Fast-forward: the tip became part of base directly.
    base.get(tip_index)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn commit(id: &str, parents: &[&str]) -> Commit {
        Commit::new(id, parents.iter().map(ToString::to_string).collect())
    }

    // Shared fixture: base o-p-q-r with feature f1-f2 forked at p and
    // merged by r (parents [q, f2]).
    fn merged_base() -> Vec<Commit> {
        vec![
            commit("r", &["q", "f2"]),
            commit("f2", &["f1"]),
            commit("f1", &["p"]),
            commit("q", &["p"]),
            commit("p", &["o"]),
            commit("o", &[]),
        ]
    }

    fn merged_feature() -> Vec<Commit> {
        vec![
            commit("f2", &["f1"]),
            commit("f1", &["p"]),
            commit("p", &["o"]),
            commit("o", &[]),
        ]
    }

    #[test]
    fn test_no_feature_commits_is_no_divergence() {
        let base = merged_base();
        assert!(first_feature_commit(&base, &[]).unwrap().is_none());
    }

    #[test]
    fn test_oldest_mismatch_is_precondition_error() {
        let base = merged_base();
        let feature = vec![commit("f1", &["p"]), commit("p", &["o"])];

        let err = first_feature_commit(&base, &feature).unwrap_err();
        assert!(err.is_precondition_violation());
        assert!(matches!(err, Error::WindowMismatch { .. }));
    }

    #[test]
    fn test_unmerged_branch() {
        // Feature f1-f2 forked at p, never merged.
        let base = vec![
            commit("q", &["p"]),
            commit("p", &["o"]),
            commit("o", &[]),
        ];
        let feature = vec![
            commit("f2", &["f1"]),
            commit("f1", &["p"]),
            commit("p", &["o"]),
            commit("o", &[]),
        ];

        let first = first_feature_commit(&base, &feature).unwrap().unwrap();
        assert_eq!(first.id, "f1");
    }

    #[test]
    fn test_unmerged_disconnected_is_structural_error() {
        // Feature claims the same oldest commit but no parent ever lands
        // in base.
        let base = vec![commit("q", &["z"]), commit("o", &[])];
        let feature = vec![commit("f2", &["f1"]), commit("o", &[])];

        let err = first_feature_commit(&base, &feature).unwrap_err();
        assert!(err.is_structural_inconsistency());
        assert!(matches!(err, Error::DisconnectedHistory { .. }));
    }

    #[test]
    fn test_merged_branch_divergence() {
        let base = merged_base();
        let feature = merged_feature();
        let first = first_feature_commit(&base, &feature)
            .unwrap()
            .unwrap();
        assert_eq!(first.id, "f1");
    }

    #[test]
    fn test_fast_forward_divergence() {
        // Base advanced to the feature tip with no merge commit. The
        // feature window carries one commit below the branching point.
        let base = vec![
            commit("f2", &["f1"]),
            commit("f1", &["p"]),
            commit("p", &["o"]),
        ];
        let feature = vec![
            commit("f2", &["f1"]),
            commit("f1", &["p"]),
            commit("p", &["o"]),
        ];

        let first = first_feature_commit(&base, &feature).unwrap().unwrap();
        assert_eq!(first.id, "f1");
    }

    #[test]
    fn test_refine_returns_guess_without_merges() {
        let feature = merged_feature();
        let guess = &feature[1];

        let refined = refine_first_feature_commit(&feature, guess, &HashSet::new());
        assert_eq!(refined.id, "f1");
    }

    #[test]
    fn test_refine_steps_past_merge_commit() {
        // f-mid is a merge commit inside the feature path: nothing at or
        // below it can be the first feature commit.
        let feature = vec![
            commit("f3", &["f-mid"]),
            commit("f-mid", &["f1", "other"]),
            commit("f1", &["p"]),
            commit("p", &["o"]),
        ];
        let merges: HashSet<CommitId> = ["f-mid".to_string()].into();
        let guess = &feature[2];

        let refined = refine_first_feature_commit(&feature, guess, &merges);
        assert_eq!(refined.id, "f3");
    }

    #[test]
    fn test_refine_ignores_merge_at_tip() {
        let feature = vec![
            commit("f-mid", &["f1", "other"]),
            commit("f1", &["p"]),
            commit("p", &["o"]),
        ];
        let merges: HashSet<CommitId> = ["f-mid".to_string()].into();
        let guess = &feature[1];

        let refined = refine_first_feature_commit(&feature, guess, &merges);
        assert_eq!(refined.id, "f1");
    }

    #[test]
    fn test_merge_point_explicit_merge() {
        let base = merged_base();
        let tip = commit("f2", &["f1"]);

        let merge = merge_point(&tip, &base).unwrap();
        assert_eq!(merge.id, "r");
    }

    #[test]
    fn test_merge_point_fast_forward() {
        // Tip is in base but no merge commit lists it as second parent.
        let base = vec![
            commit("s", &["f2"]),
            commit("f2", &["f1"]),
            commit("f1", &["p"]),
            commit("p", &["o"]),
        ];
        let tip = commit("f2", &["f1"]);

        let merge = merge_point(&tip, &base).unwrap();
        assert_eq!(merge.id, "f2");
    }

    #[test]
    fn test_merge_point_not_merged() {
        let base = vec![commit("q", &["p"]), commit("p", &["o"])];
        let tip = commit("f2", &["f1"]);

        assert!(merge_point(&tip, &base).is_none());
    }

    #[test]
    fn test_merge_point_empty_base() {
        let tip = commit("f2", &["f1"]);
        assert!(merge_point(&tip, &[]).is_none());
    }
}
