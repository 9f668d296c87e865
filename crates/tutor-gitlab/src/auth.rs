//! Authentication handling for the GitLab API.

use secrecy::SecretString;

use crate::error::{Error, Result};

/// Authentication method for the GitLab API.
#[derive(Debug, Clone)]
pub enum Auth {
    /// Use token from an environment variable.
    EnvVar(String),

    /// Use a specific token.
    Token(SecretString),
}

impl Auth {
    /// Create auth reading the conventional `GITLAB_TOKEN` variable.
    #[must_use]
    pub fn auto() -> Self {
        Self::EnvVar("GITLAB_TOKEN".into())
    }

    /// Resolve the authentication to a token.
    ///
    /// # Errors
    /// Returns error if the token cannot be obtained.
    pub fn resolve(&self) -> Result<SecretString> {
        match self {
            Self::EnvVar(var) => std::env::var(var)
                .map(SecretString::from)
                .map_err(|_| Error::NoToken(var.clone())),
            Self::Token(token) => Ok(token.clone()),
        }
    }
}

impl Default for Auth {
    fn default() -> Self {
        Self::auto()
    }
}
