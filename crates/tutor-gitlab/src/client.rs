//! GitLab API client.

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

use crate::auth::Auth;
use crate::error::{Error, Result};
use crate::traits::GitLabApi;
use crate::types::{GitLabBranch, GitLabCommit, GitLabEvent, GitLabTag, PushAction};

/// GitLab caps `per_page` at 100; fetching fewer just multiplies requests.
const PER_PAGE: usize = 100;

// === Internal API response types ===

/// Internal representation of a commit from the GitLab API.
#[derive(serde::Deserialize)]
struct ApiCommit {
    id: String,
    #[serde(default)]
    parent_ids: Vec<String>,
    created_at: DateTime<Utc>,
    author_name: Option<String>,
    message: Option<String>,
}

impl ApiCommit {
    fn into_commit(self) -> GitLabCommit {
        GitLabCommit {
            id: self.id,
            parent_ids: self.parent_ids,
            created_at: self.created_at,
            author_name: self.author_name,
            message: self.message,
        }
    }
}

/// Internal representation of a branch or tag ref from the GitLab API.
#[derive(serde::Deserialize)]
struct ApiRef {
    name: String,
    commit: ApiCommitRef,
}

#[derive(serde::Deserialize)]
struct ApiCommitRef {
    id: String,
}

/// Internal representation of a project event from the GitLab API.
#[derive(serde::Deserialize)]
struct ApiEvent {
    created_at: DateTime<Utc>,
    action_name: String,
    /// Present only on push events.
    push_data: Option<ApiPushData>,
}

#[derive(serde::Deserialize)]
struct ApiPushData {
    ref_type: Option<String>,
    #[serde(rename = "ref")]
    ref_name: Option<String>,
    commit_from: Option<String>,
    commit_to: Option<String>,
}

impl ApiEvent {
    /// Convert API response to domain type; events without push data carry
    /// no ref information and are dropped.
    fn into_event(self) -> Option<GitLabEvent> {
        let push = self.push_data?;
        let action = PushAction::parse(&self.action_name);

        // A deletion reports the old target, a push the new one.
        let commit_id = match action {
            PushAction::Deleted => push.commit_from,
            _ => push.commit_to,
        }?;

        Some(GitLabEvent {
            date: self.created_at,
            action,
            ref_type: push.ref_type?,
            ref_name: push.ref_name?,
            commit_id,
        })
    }
}

/// GitLab API client for a single project.
pub struct GitLabClient {
    http: Client,
    base_url: String,
    project: String,
}

impl GitLabClient {
    /// Create a client for a project on a GitLab instance.
    ///
    /// `project` is either the numeric project id or a `group/name` path.
    ///
    /// # Errors
    /// Returns error if the token cannot be resolved or the HTTP client
    /// cannot be built.
    pub fn new(base_url: impl Into<String>, project: impl Into<String>, auth: &Auth) -> Result<Self> {
        let token = auth.resolve()?;

        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(token.expose_secret())
            .map_err(|_| Error::AuthenticationFailed)?;
        value.set_sensitive(true);
        headers.insert("PRIVATE-TOKEN", value);

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("tutor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            project: project.into(),
        })
    }

    fn project_url(&self, rest: &str) -> String {
        // Project paths go into the URL percent-encoded (group%2Fname).
        let project = self.project.replace('/', "%2F");
        format!("{}/api/v4/projects/{}/{}", self.base_url, project, rest)
    }

    /// Follow GitLab's page-numbered pagination until a short page.
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let mut results = Vec::new();
        let mut page = 1usize;

        loop {
            let response = self
                .http
                .get(url)
                .query(query)
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())])
                .send()
                .await?;

            let batch: Vec<T> = self.check(response).await?;
            let len = batch.len();
            results.extend(batch);

            if len < PER_PAGE {
                return Ok(results);
            }
            page += 1;
        }
    }

    /// Map a response to a parsed body or an API error.
    async fn check<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::AuthenticationFailed),
            StatusCode::NOT_FOUND => Err(Error::ProjectNotFound(self.project.clone())),
            StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimited),
            _ if status.is_success() => {
                let body = response.text().await?;
                Ok(serde_json::from_str(&body)?)
            }
            _ => {
                let message = response.text().await.unwrap_or_default();
                Err(Error::ApiError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

impl GitLabApi for GitLabClient {
    async fn fetch_commits(
        &self,
        ref_name: Option<&str>,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<GitLabCommit>> {
        let url = self.project_url("repository/commits");

        let mut query: Vec<(&str, String)> = Vec::new();
        match ref_name {
            Some(name) => query.push(("ref_name", name.to_string())),
            // Without a ref filter, list commits from every ref.
            None => query.push(("all", "true".to_string())),
        }
        if let Some(since) = since {
            query.push(("since", since.to_rfc3339()));
        }
        if let Some(until) = until {
            query.push(("until", until.to_rfc3339()));
        }

        let commits: Vec<ApiCommit> = self.get_paginated(&url, &query).await?;
        Ok(commits.into_iter().map(ApiCommit::into_commit).collect())
    }

    async fn fetch_branches(&self) -> Result<Vec<GitLabBranch>> {
        let url = self.project_url("repository/branches");
        let refs: Vec<ApiRef> = self.get_paginated(&url, &[]).await?;
        Ok(refs
            .into_iter()
            .map(|r| GitLabBranch {
                name: r.name,
                commit_id: r.commit.id,
            })
            .collect())
    }

    async fn fetch_tags(&self) -> Result<Vec<GitLabTag>> {
        let url = self.project_url("repository/tags");
        let refs: Vec<ApiRef> = self.get_paginated(&url, &[]).await?;
        Ok(refs
            .into_iter()
            .map(|r| GitLabTag {
                name: r.name,
                commit_id: r.commit.id,
            })
            .collect())
    }

    async fn fetch_events(&self) -> Result<Vec<GitLabEvent>> {
        let url = self.project_url("events");
        let events: Vec<ApiEvent> = self.get_paginated(&url, &[]).await?;
        Ok(events.into_iter().filter_map(ApiEvent::into_event).collect())
    }
}
