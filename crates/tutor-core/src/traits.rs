//! Trait abstractions for history providers.
//!
//! This module defines the `HistorySource` trait which abstracts where a
//! history snapshot comes from, enabling dependency injection and
//! testability.

use crate::Result;
use crate::snapshot::{Snapshot, Window};

/// Trait for fetching history snapshots from a backend.
///
/// This trait abstracts snapshot fetching, allowing for:
/// - Backend selection (local repository, GitLab API) via a strategy
///   object built at startup
/// - Mock implementations for testing
///
/// The engine itself never performs I/O; everything it analyzes arrives
/// through this interface as an immutable snapshot.
pub trait HistorySource {
    /// A short name for the backend, for display and logging.
    fn kind(&self) -> &'static str;

    /// Fetch the commits reachable inside the window, newest first.
    ///
    /// `window.branch` restricts the listing to one branch; `None` lists
    /// commits from all refs.
    ///
    /// # Errors
    /// Returns error if the backend cannot be read.
    fn fetch_commits(&self, window: &Window) -> Result<Vec<crate::commit::Commit>>;

    /// Fetch a full snapshot: commits, branch refs, tags and events.
    ///
    /// # Errors
    /// Returns error if the backend cannot be read.
    fn fetch_snapshot(&self, window: &Window) -> Result<Snapshot>;
}
