//! # tutor-core
//!
//! Core analysis engine for Tutor: reconstructs branch topology and
//! temporal ref state from flat history snapshots so individual commits
//! can be attributed to students and branches for grading.
//!
//! The engine is deterministic and side-effect free: everything it needs
//! arrives as an immutable [`Snapshot`] through a [`HistorySource`], and
//! every graph walk is bounded by the snapshot's commit-id set.

pub mod attribution;
pub mod commit;
pub mod config;
mod error;
pub mod graph;
pub mod snapshot;
pub mod source;
pub mod timeline;
pub mod traits;

pub use attribution::{first_feature_commit, merge_point, refine_first_feature_commit};
pub use commit::{Commit, CommitId, Tag, find_commit};
pub use config::{Config, SourceKind};
pub use error::{Error, Result};
pub use graph::{Boundary, BranchPath, CommitGraph, MergeParents, branch_paths, identify_merge_parents};
pub use snapshot::{RefSet, Snapshot, Window};
pub use source::LocalHistory;
pub use timeline::{Event, EventAction, RefType, tags_at_date};
pub use traits::HistorySource;
