//! Parsed semantic version value

use std::fmt;

/// A semantic version found inside a release name.
///
/// Pre-release and build metadata are kept verbatim; an empty string means
/// the component was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SemVerInfo {
    major: u32,
    minor: u32,
    patch: u32,
    pre_release: String,
    build: String,
}

impl SemVerInfo {
    /// Create a version without pre-release or build metadata
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: String::new(),
            build: String::new(),
        }
    }

    pub fn with_pre_release(mut self, pre_release: impl Into<String>) -> Self {
        self.pre_release = pre_release.into();
        self
    }

    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = build.into();
        self
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    pub fn pre_release(&self) -> &str {
        &self.pre_release
    }

    pub fn build(&self) -> &str {
        &self.build
    }

    pub fn has_pre_release(&self) -> bool {
        !self.pre_release.is_empty()
    }

    pub fn has_build(&self) -> bool {
        !self.build.is_empty()
    }

    /// Canonical installed-version form: `vMAJOR.MINOR.PATCH[-PRERELEASE]`.
    ///
    /// Build metadata is dropped.
    pub fn canonical(&self) -> String {
        let mut version = format!("v{}.{}.{}", self.major, self.minor, self.patch);
        if self.has_pre_release() {
            version.push('-');
            version.push_str(&self.pre_release);
        }
        version
    }
}

impl fmt::Display for SemVerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.has_pre_release() {
            write!(f, "-{}", self.pre_release)?;
        }
        if self.has_build() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}
