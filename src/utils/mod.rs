pub mod download;
pub mod platform;
pub mod release;
pub mod runner;

use semver::{BuildMetadata, Version};
use std::cmp::Ordering;

fn parse_version(version: &str) -> Option<Version> {
    let stripped = version
        .trim()
        .trim_start_matches(|c: char| c == '=' || c == 'v' || c == 'V');

    // Build metadata is not part of the canonical form or of precedence.
    let mut version = Version::parse(stripped).ok()?;
    version.build = BuildMetadata::EMPTY;
    Some(version)
}

/// Canonical semver form of `version` without the tag prefix or build
/// metadata, e.g. `" v3.10.2+build.1 "` becomes `"3.10.2"`. `None` when it
/// is not a version.
pub fn clean(version: &str) -> Option<String> {
    parse_version(version).map(|v| v.to_string())
}

/// Falls back to the input unchanged when it cannot be cleaned, so noisy
/// feed tags do not abort the pipeline.
pub fn clean_or_passthrough(version: &str) -> String {
    clean(version).unwrap_or_else(|| version.to_string())
}

/// Tag form used in release URLs and cache keys: `v<major>.<minor>.<patch>[-pre]`.
pub fn to_tag(version: &str) -> String {
    match clean(version) {
        Some(cleaned) => format!("v{}", cleaned),
        None if version.starts_with('v') => version.to_string(),
        None => format!("v{}", version),
    }
}

fn compare(a: &str, b: &str) -> Option<Ordering> {
    Some(parse_version(a)?.cmp(&parse_version(b)?))
}

pub fn less_than(a: &str, b: &str) -> bool {
    compare(a, b) == Some(Ordering::Less)
}

pub fn greater_than(a: &str, b: &str) -> bool {
    compare(a, b) == Some(Ordering::Greater)
}

pub fn is_latest(version: &str) -> bool {
    version.trim().eq_ignore_ascii_case("latest")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_prefix_and_whitespace() {
        assert_eq!(clean("v3.10.2").as_deref(), Some("3.10.2"));
        assert_eq!(clean("  =v3.10.2\n").as_deref(), Some("3.10.2"));
        assert_eq!(clean("3.10.2-rc.1").as_deref(), Some("3.10.2-rc.1"));
        assert_eq!(clean("not-a-version"), None);
        assert_eq!(clean("3.10"), None);
        assert_eq!(clean("v1.0.0+build.5").as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_clean_is_idempotent() {
        for input in ["v3.10.2", "3.7.3", " v3.9.0-rc1 ", "garbage", "v1.0.0+build.5"] {
            let once = clean_or_passthrough(input);
            assert_eq!(clean_or_passthrough(&once), once, "input {:?}", input);

            let tag = to_tag(input);
            assert_eq!(to_tag(&tag), tag, "input {:?}", input);
        }
    }

    #[test]
    fn test_to_tag() {
        assert_eq!(to_tag("3.10.2"), "v3.10.2");
        assert_eq!(to_tag("v3.10.2"), "v3.10.2");
        assert_eq!(to_tag("V3.8.0"), "v3.8.0");
        assert_eq!(to_tag("nightly"), "vnightly");
        assert_eq!(to_tag("vnext"), "vnext");
        assert_eq!(to_tag("3.10.2+build.1"), "v3.10.2");
        assert_eq!(to_tag("v3.10.2-rc.1+sha.abc"), "v3.10.2-rc.1");
    }

    #[test]
    fn test_ordering() {
        assert!(less_than("v3.7.3", "3.8.0"));
        assert!(!less_than("3.8.0", "3.8.0"));
        assert!(greater_than("v3.10.0", "v3.9.9"));
        assert!(less_than("3.9.0-rc1", "3.9.0"));
        assert!(!less_than("garbage", "3.8.0"));
        assert!(!greater_than("garbage", "3.8.0"));
        assert!(!greater_than("3.10.2+build.2", "3.10.2+build.1"));
    }

    #[test]
    fn test_is_latest() {
        assert!(is_latest("latest"));
        assert!(is_latest(" LATEST "));
        assert!(!is_latest("v3.10.2"));
    }
}
