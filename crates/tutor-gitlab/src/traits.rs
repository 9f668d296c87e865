//! Trait abstractions for GitLab API operations.
//!
//! This module defines the `GitLabApi` trait which abstracts the API
//! calls Tutor makes, enabling dependency injection and testability.

use chrono::{DateTime, Utc};

use crate::types::{GitLabBranch, GitLabCommit, GitLabEvent, GitLabTag};
use crate::Result;

/// Trait for GitLab API operations.
///
/// This trait abstracts the API surface, allowing for:
/// - Dependency injection in the CLI's service layer
/// - Mock implementations for testing
pub trait GitLabApi: Send + Sync {
    /// List commits, newest first.
    ///
    /// `ref_name` restricts the listing to one branch; `None` lists
    /// commits from every ref. `since`/`until` bound the commit times.
    fn fetch_commits(
        &self,
        ref_name: Option<&str>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> impl std::future::Future<Output = Result<Vec<GitLabCommit>>> + Send;

    /// List branches.
    fn fetch_branches(&self) -> impl std::future::Future<Output = Result<Vec<GitLabBranch>>> + Send;

    /// List tags.
    fn fetch_tags(&self) -> impl std::future::Future<Output = Result<Vec<GitLabTag>>> + Send;

    /// List ref-lifecycle events, newest first. Events that carry no push
    /// data are dropped.
    fn fetch_events(&self) -> impl std::future::Future<Output = Result<Vec<GitLabEvent>>> + Send;
}
