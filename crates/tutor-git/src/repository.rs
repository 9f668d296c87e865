//! Repository wrapper reading history snapshots from a local repository.

use std::path::Path;

use chrono::{DateTime, Utc};
use git2::{BranchType, Sort};

use crate::error::{Error, Result};

/// A single commit read from the repository.
#[derive(Debug, Clone)]
pub struct CommitRecord {
    /// Full commit id (hex).
    pub id: String,

    /// Parent commit ids, mainline parent first. Empty for a root commit.
    pub parent_ids: Vec<String>,

    /// Author time of the commit.
    pub created_at: Option<DateTime<Utc>>,

    /// Author name, if recorded.
    pub author: Option<String>,

    /// Commit message, if valid UTF-8.
    pub message: Option<String>,
}

/// A tag read from the repository, peeled to the commit it points at.
#[derive(Debug, Clone)]
pub struct TagRecord {
    /// Tag name without the `refs/tags/` prefix.
    pub name: String,

    /// Id of the tagged commit.
    pub commit_id: String,
}

/// High-level read-only wrapper around a git repository.
pub struct Repository {
    inner: git2::Repository,
}

impl Repository {
    /// Open a repository at the given path.
    ///
    /// # Errors
    /// Returns error if no repository found at path or any parent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let inner = git2::Repository::discover(path)?;
        Ok(Self { inner })
    }

    /// Open the repository containing the current directory.
    ///
    /// # Errors
    /// Returns error if not inside a git repository.
    pub fn open_current() -> Result<Self> {
        Self::open(".")
    }

    /// Walk all refs newest-first and collect commits inside the window.
    ///
    /// Equivalent to `git log --all` bounded by author time: commits dated
    /// before `since` or after `until` are skipped, not an error.
    ///
    /// # Errors
    /// Returns error if the revwalk fails.
    pub fn commits(
        &self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<CommitRecord>> {
        let mut walk = self.inner.revwalk()?;
        walk.push_glob("refs/*")?;
        self.collect_walk(walk, since, until)
    }

    /// Walk a single branch newest-first and collect commits inside the
    /// window, like `git log <branch>`.
    ///
    /// # Errors
    /// Returns error if the branch doesn't exist or the revwalk fails.
    pub fn branch_commits(
        &self,
        branch: &str,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<CommitRecord>> {
        let target = self
            .inner
            .find_branch(branch, BranchType::Local)
            .map_err(|_| Error::BranchNotFound(branch.into()))?
            .get()
            .target()
            .ok_or_else(|| Error::BranchNotFound(branch.into()))?;

        let mut walk = self.inner.revwalk()?;
        walk.push(target)?;
        self.collect_walk(walk, since, until)
    }

    fn collect_walk(
        &self,
        mut walk: git2::Revwalk<'_>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<CommitRecord>> {
        walk.set_sorting(Sort::TIME)?;

        let mut records = Vec::new();
        for oid in walk {
            let commit = self.inner.find_commit(oid?)?;
            let created_at = DateTime::from_timestamp(commit.time().seconds(), 0);

            if created_at.zip(since).is_some_and(|(c, start)| c < start) {
                continue;
            }
            if created_at.zip(until).is_some_and(|(c, end)| c > end) {
                continue;
            }

            records.push(CommitRecord {
                id: commit.id().to_string(),
                parent_ids: commit.parent_ids().map(|p| p.to_string()).collect(),
                created_at,
                author: commit.author().name().map(String::from),
                message: commit.message().map(String::from),
            });
        }

        Ok(records)
    }

    /// List local branches as `(name, commit_id)` pairs.
    ///
    /// # Errors
    /// Returns error if branch listing fails.
    pub fn branch_refs(&self) -> Result<Vec<(String, String)>> {
        let branches = self.inner.branches(Some(BranchType::Local))?;

        let mut refs = Vec::new();
        for entry in branches {
            let (branch, _) = entry?;
            let Some(name) = branch.name()?.map(String::from) else {
                continue;
            };
            let Some(target) = branch.get().target() else {
                continue;
            };
            refs.push((name, target.to_string()));
        }

        Ok(refs)
    }

    /// List tags, peeling annotated tags to the commits they point at.
    ///
    /// # Errors
    /// Returns error if a tag ref cannot be resolved to a commit.
    pub fn tags(&self) -> Result<Vec<TagRecord>> {
        let names = self.inner.tag_names(None)?;

        let mut tags = Vec::new();
        for name in names.iter().flatten() {
            let refname = format!("refs/tags/{name}");
            let reference = self
                .inner
                .find_reference(&refname)
                .map_err(|_| Error::RefNotFound(refname.clone()))?;
            let commit = reference
                .peel_to_commit()
                .map_err(|_| Error::NotACommit(refname))?;
            tags.push(TagRecord {
                name: name.to_string(),
                commit_id: commit.id().to_string(),
            });
        }

        Ok(tags)
    }

    /// Get the commit id a branch points at.
    ///
    /// # Errors
    /// Returns error if the branch doesn't exist.
    pub fn branch_commit(&self, branch_name: &str) -> Result<String> {
        let branch = self
            .inner
            .find_branch(branch_name, BranchType::Local)
            .map_err(|_| Error::BranchNotFound(branch_name.into()))?;

        branch
            .get()
            .target()
            .map(|oid| oid.to_string())
            .ok_or_else(|| Error::BranchNotFound(branch_name.into()))
    }

    /// Check if a branch exists.
    #[must_use]
    pub fn branch_exists(&self, name: &str) -> bool {
        self.inner.find_branch(name, BranchType::Local).is_ok()
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.inner.path())
            .finish()
    }
}
