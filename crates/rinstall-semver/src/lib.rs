//! Semantic version extraction for release artifacts
//!
//! This crate locates the first semantic version embedded in a free-form
//! string (typically a release archive name such as
//! `myapp-v1.2.3-rc.1+build5.tar.gz`) and parses it into a [`SemVerInfo`].

mod extractor;
mod info;

pub use extractor::{extract_semver, ParseError};
pub use info::SemVerInfo;
