//! Error types for tutor-gitlab.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitLab API operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Authentication failed or token rejected.
    #[error("GitLab authentication failed - check the API token")]
    AuthenticationFailed,

    /// Token not found.
    #[error("no GitLab token found - set {0}")]
    NoToken(String),

    /// API rate limit exceeded.
    #[error("GitLab API rate limit exceeded - wait and try again")]
    RateLimited,

    /// Project not found or no access.
    #[error("project not found or no access: {0}")]
    ProjectNotFound(String),

    /// API error with status code.
    #[error("GitLab API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Network error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("failed to parse GitLab response: {0}")]
    Parse(#[from] serde_json::Error),
}
