//! Local repository history source.

use std::path::Path;

use tutor_git::{CommitRecord, Repository};

use crate::Result;
use crate::commit::{Commit, Tag};
use crate::snapshot::{RefSet, Snapshot, Window};
use crate::traits::HistorySource;

/// History source reading an on-disk repository through tutor-git.
///
/// Local repositories keep no push-event log, so snapshots carry an empty
/// event list and temporal queries degenerate to the current tag set.
#[derive(Debug)]
pub struct LocalHistory {
    repo: Repository,
}

impl LocalHistory {
    /// Open the repository at the given path.
    ///
    /// # Errors
    /// Returns error if no repository is found at the path or any parent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            repo: Repository::open(path)?,
        })
    }

    /// Wrap an already-open repository.
    #[must_use]
    pub const fn new(repo: Repository) -> Self {
        Self { repo }
    }
}

fn into_commit(record: CommitRecord) -> Commit {
    Commit {
        id: record.id,
        parent_ids: record.parent_ids,
        created_at: record.created_at,
        author: record.author,
        message: record.message,
    }
}

impl HistorySource for LocalHistory {
    fn kind(&self) -> &'static str {
        "local"
    }

    fn fetch_commits(&self, window: &Window) -> Result<Vec<Commit>> {
        let records = match &window.branch {
            Some(branch) => self.repo.branch_commits(branch, window.since, window.until)?,
            None => self.repo.commits(window.since, window.until)?,
        };
        Ok(records.into_iter().map(into_commit).collect())
    }

    fn fetch_snapshot(&self, window: &Window) -> Result<Snapshot> {
        let commits = self.fetch_commits(window)?;

        let refs: RefSet = self.repo.branch_refs()?.into_iter().collect();

        let tags = self
            .repo
            .tags()?
            .into_iter()
            .map(|tag| Tag::new(tag.name, tag.commit_id))
            .collect();

        Ok(Snapshot {
            commits,
            refs,
            tags,
            events: Vec::new(),
        })
    }
}
