//! Leftmost search for a semantic version inside free-form text

use std::num::ParseIntError;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::SemVerInfo;

/// Error type for version extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("version string \"{input}\" does not follow semantic versioning requirements")]
    NoVersion { input: String },
    #[error("invalid {component} version \"{value}\": {source}")]
    Component {
        component: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Archive extensions stripped from the end of the input before searching.
/// The build metadata grammar accepts dots, so without this `.tar.gz` would
/// end up inside the build (or pre-release) capture.
const ARCHIVE_SUFFIXES: &[&str] = &[
    ".tar.gz", ".tgz", ".tar.bz2", ".tbz2", ".tar.xz", ".txz", ".tar", ".zip",
];

// Numeric identifiers are ASCII only, `\d` would accept any Unicode digit.
const PRE_RELEASE_ID: &str = r"(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)";

lazy_static! {
    // Release version regex. The leading and trailing digit boundaries keep
    // a leading zero ("01.2.3", "1.2.03") from being skipped over to a
    // shorter match inside the same number.
    static ref RELEASE_RE: Regex = Regex::new(&format!(
        r"(?:^|[^0-9])(?:v|release-v)?(?P<major>0|[1-9][0-9]*)\.(?P<minor>0|[1-9][0-9]*)\.(?P<patch>0|[1-9][0-9]*)(?:-(?P<pre>{id}(?:\.{id})*))?(?:\+(?P<build>[0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?(?:$|[^0-9])",
        id = PRE_RELEASE_ID
    )).unwrap();
}

/// Find and parse the first semantic version contained in `input`.
///
/// The input does not need to be a bare version: `release-v2.0.0`,
/// `myapp-v1.2.3-rc.1+build5.tar.gz` and `1.2.3` all match. The `v` and
/// `release-v` prefixes are discarded.
///
/// # Examples
///
/// ```
/// use rinstall_semver::extract_semver;
///
/// let info = extract_semver("myapp-v1.2.3-rc.1+build5.tar.gz").unwrap();
/// assert_eq!(info.major(), 1);
/// assert_eq!(info.pre_release(), "rc.1");
/// assert_eq!(info.build(), "build5");
/// assert_eq!(info.canonical(), "v1.2.3-rc.1");
///
/// assert!(extract_semver("no-version-here").is_err());
/// ```
pub fn extract_semver(input: &str) -> Result<SemVerInfo, ParseError> {
    let haystack = strip_archive_suffix(input);

    let caps = RELEASE_RE
        .captures(haystack)
        .ok_or_else(|| ParseError::NoVersion {
            input: input.to_string(),
        })?;

    let major = parse_component("major", &caps["major"])?;
    let minor = parse_component("minor", &caps["minor"])?;
    let patch = parse_component("patch", &caps["patch"])?;

    let pre_release = caps.name("pre").map_or("", |m| m.as_str());
    let build = caps.name("build").map_or("", |m| m.as_str());

    Ok(SemVerInfo::new(major, minor, patch)
        .with_pre_release(pre_release)
        .with_build(build))
}

fn parse_component(component: &'static str, value: &str) -> Result<u32, ParseError> {
    value.parse::<u32>().map_err(|source| ParseError::Component {
        component,
        value: value.to_string(),
        source,
    })
}

fn strip_archive_suffix(input: &str) -> &str {
    let lower = input.to_ascii_lowercase();
    ARCHIVE_SUFFIXES
        .iter()
        .find(|suffix| lower.ends_with(*suffix))
        .map_or(input, |suffix| &input[..input.len() - suffix.len()])
}
