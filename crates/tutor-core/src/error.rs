//! Error types for tutor-core.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tutor-core operations.
///
/// Two fatal families exist: precondition violations (the caller supplied a
/// misconfigured window) and structural inconsistencies (the data itself is
/// suspect - truncated fetch, force-push). "Not found" outcomes are never
/// errors; operations return `Option` for those.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Base and feature histories don't share their oldest commit.
    #[error(
        "base and feature histories must share their oldest commit \
         (base: {base_oldest}, feature: {feature_oldest})"
    )]
    WindowMismatch {
        /// Oldest commit id of the base window.
        base_oldest: String,
        /// Oldest commit id of the feature window.
        feature_oldest: String,
    },

    /// Commit id and parent-list columns are not parallel.
    #[error("commit ids and parent lists are not parallel ({ids} ids, {parents} parent lists)")]
    MismatchedColumns { ids: usize, parents: usize },

    /// Feature history has no ancestor link into base.
    #[error("feature history is disconnected from base (tip: {tip})")]
    DisconnectedHistory {
        /// Tip commit id of the feature branch.
        tip: String,
    },

    /// The window lacks the boundary commit needed to resolve a fast-forward.
    #[error("history window too narrow to resolve a fast-forward divergence ({len} feature commits)")]
    WindowTooNarrow { len: usize },

    /// Git operation error from the local provider.
    #[error("git error: {0}")]
    Git(#[from] tutor_git::Error),

    /// A history provider failed to produce a snapshot.
    #[error("{kind} source error: {message}")]
    Source {
        /// Backend kind, as reported by [`HistorySource::kind`](crate::traits::HistorySource::kind).
        kind: &'static str,
        /// Provider-specific failure description.
        message: String,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Whether this error is a caller-side precondition violation.
    #[must_use]
    pub const fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            Self::WindowMismatch { .. } | Self::MismatchedColumns { .. }
        )
    }

    /// Whether this error signals inconsistent upstream data.
    #[must_use]
    pub const fn is_structural_inconsistency(&self) -> bool {
        matches!(
            self,
            Self::DisconnectedHistory { .. } | Self::WindowTooNarrow { .. }
        )
    }
}
