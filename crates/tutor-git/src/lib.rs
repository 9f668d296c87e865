//! # tutor-git
//!
//! Local repository snapshot provider for Tutor, built on git2-rs.
//! Reads commits, refs and tags from an on-disk repository into flat
//! records that the analysis engine consumes.

mod error;
mod repository;

pub use error::{Error, Result};
pub use git2::Oid;
pub use repository::{CommitRecord, Repository, TagRecord};
