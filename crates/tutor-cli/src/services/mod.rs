//! Service layer bridging history providers and the analysis engine.

pub mod history;

pub use history::build_source;
