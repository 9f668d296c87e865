//! History source selection and GitLab payload normalization.
//!
//! The engine consumes snapshots through the `HistorySource` trait; this
//! module builds the right backend from configuration at startup and
//! adapts GitLab API payloads into the engine's normalized shapes.

use anyhow::{Context, Result};
use tutor_core::{
    Commit, Config, Event, EventAction, HistorySource, LocalHistory, RefSet, RefType, Snapshot,
    SourceKind, Tag, Window,
};
use tutor_gitlab::{Auth, GitLabApi, GitLabClient, GitLabEvent, PushAction};

/// Build the history source the configuration asks for.
///
/// `repo_override` forces the local backend on a specific path, which is
/// what `--repo` does.
pub fn build_source(config: &Config, repo_override: Option<&str>) -> Result<Box<dyn HistorySource>> {
    if let Some(path) = repo_override {
        return Ok(Box::new(LocalHistory::open(path)?));
    }

    match config.source.kind {
        SourceKind::Local => Ok(Box::new(LocalHistory::open(&config.source.path)?)),
        SourceKind::Gitlab => {
            let url = config
                .source
                .url
                .as_deref()
                .context("source.url is required for the gitlab source")?;
            let project = config
                .source
                .project
                .as_deref()
                .context("source.project is required for the gitlab source")?;

            let auth = Auth::EnvVar(config.source.token_env.clone());
            let client = GitLabClient::new(url, project, &auth)
                .with_context(|| format!("cannot reach GitLab project {project}"))?;

            Ok(Box::new(GitLabHistory::new(client)?))
        }
    }
}

/// History source fetching snapshots from the GitLab API.
///
/// The API client is async while the engine is strictly synchronous, so
/// fetches block on a dedicated runtime.
pub struct GitLabHistory {
    client: GitLabClient,
    runtime: tokio::runtime::Runtime,
}

impl GitLabHistory {
    /// Wrap a client with its own runtime.
    ///
    /// # Errors
    /// Returns error if the runtime cannot be built.
    pub fn new(client: GitLabClient) -> Result<Self> {
        Ok(Self {
            client,
            runtime: tokio::runtime::Runtime::new()?,
        })
    }

    fn source_error(error: &tutor_gitlab::Error) -> tutor_core::Error {
        tutor_core::Error::Source {
            kind: "gitlab",
            message: error.to_string(),
        }
    }
}

impl HistorySource for GitLabHistory {
    fn kind(&self) -> &'static str {
        "gitlab"
    }

    fn fetch_commits(&self, window: &Window) -> tutor_core::Result<Vec<Commit>> {
        let commits = self
            .runtime
            .block_on(
                self.client
                    .fetch_commits(window.branch.as_deref(), window.since, window.until),
            )
            .map_err(|e| Self::source_error(&e))?;

        Ok(commits.into_iter().map(into_commit).collect())
    }

    fn fetch_snapshot(&self, window: &Window) -> tutor_core::Result<Snapshot> {
        let commits = self.fetch_commits(window)?;

        let (branches, tags, events) = self
            .runtime
            .block_on(async {
                let branches = self.client.fetch_branches().await?;
                let tags = self.client.fetch_tags().await?;
                let events = self.client.fetch_events().await?;
                Ok::<_, tutor_gitlab::Error>((branches, tags, events))
            })
            .map_err(|e| Self::source_error(&e))?;

        let refs: RefSet = branches
            .into_iter()
            .map(|branch| (branch.name, branch.commit_id))
            .collect();

        Ok(Snapshot {
            commits,
            refs,
            tags: tags
                .into_iter()
                .map(|tag| Tag::new(tag.name, tag.commit_id))
                .collect(),
            events: events.into_iter().filter_map(into_event).collect(),
        })
    }
}

fn into_commit(commit: tutor_gitlab::GitLabCommit) -> Commit {
    Commit {
        id: commit.id,
        parent_ids: commit.parent_ids,
        created_at: Some(commit.created_at),
        author: commit.author_name,
        message: commit.message,
    }
}

/// Normalize a GitLab push event; events the engine doesn't track map to
/// `None`.
fn into_event(event: GitLabEvent) -> Option<Event> {
    let action = match event.action {
        PushAction::PushedNew => EventAction::PushedNew,
        PushAction::PushedTo => EventAction::PushedTo,
        PushAction::Deleted => EventAction::Deleted,
        PushAction::Other => return None,
    };

    let ref_type = match event.ref_type.as_str() {
        "branch" => RefType::Branch,
        "tag" => RefType::Tag,
        "commit" => RefType::Commit,
        _ => RefType::Other,
    };

    Some(Event {
        date: event.date,
        action,
        ref_type,
        ref_name: event.ref_name,
        commit_id: event.commit_id,
    })
}
