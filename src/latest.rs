//! Resolution of the `latest` version specifier against the release feed.
//!
//! Lookups never fail: any problem with the feed is reported through
//! [`LatestResolution::FallenBack`] carrying the configured default version.

use crate::error::SetupError;
use crate::utils::{clean, clean_or_passthrough, greater_than};
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct FeedResponse {
    pub status: u16,
    pub body: Option<Value>,
}

/// Read access to the release feed. Implemented over HTTP by
/// [`crate::utils::download::HttpClient`].
pub trait ReleaseFeed {
    fn get_json(&self, url: &str) -> Result<FeedResponse>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LatestStrategy {
    /// Ask the feed for its latest release.
    #[default]
    Direct,
    /// List every release and pick the highest non-rc tag.
    Enumerate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestResolution {
    Resolved(String),
    FallenBack { version: String, reason: String },
}

impl LatestResolution {
    pub fn version(&self) -> &str {
        match self {
            LatestResolution::Resolved(version) => version,
            LatestResolution::FallenBack { version, .. } => version,
        }
    }
}

pub fn latest_release_url(repo: &str) -> String {
    format!("https://github.com/{}/releases/latest", repo)
}

pub fn releases_list_url(repo: &str) -> String {
    format!("https://api.github.com/repos/{}/releases", repo)
}

pub fn resolve_latest(
    feed: &dyn ReleaseFeed,
    strategy: LatestStrategy,
    repo: &str,
    tool: &str,
    default_version: &str,
) -> LatestResolution {
    let (url, outcome) = match strategy {
        LatestStrategy::Direct => {
            let url = latest_release_url(repo);
            let outcome = direct_latest(feed, &url);
            (url, outcome)
        }
        LatestStrategy::Enumerate => {
            let url = releases_list_url(repo);
            let outcome = enumerate_max(feed, &url, default_version);
            (url, outcome)
        }
    };

    match outcome {
        Ok(version) => {
            debug!(%version, ?strategy, "Resolved latest release");
            LatestResolution::Resolved(version)
        }
        Err(e) => {
            let failure = SetupError::FeedLookupFailed {
                tool: tool.to_string(),
                url,
                reason: format!("{:#}", e),
            };
            warn!("{}. Using default version {}.", failure, default_version);
            LatestResolution::FallenBack {
                version: default_version.to_string(),
                reason: failure.to_string(),
            }
        }
    }
}

fn fetch(feed: &dyn ReleaseFeed, url: &str) -> Result<Value> {
    let response = feed.get_json(url)?;

    if response.status != 200 {
        bail!("Invalid response: HTTP {}", response.status);
    }

    response
        .body
        .context("Invalid response: empty or non-JSON body")
}

fn tag_name(entry: &Value) -> Option<&str> {
    entry
        .get("tag_name")
        .and_then(Value::as_str)
        .filter(|tag| !tag.is_empty())
}

fn direct_latest(feed: &dyn ReleaseFeed, url: &str) -> Result<String> {
    let body = fetch(feed, url)?;

    tag_name(&body)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Invalid response: no tag_name in {}", body))
}

// Pre-releases are recognised by an `rc` substring in the cleaned tag, not by
// the semver pre-release field.
fn enumerate_max(
    feed: &dyn ReleaseFeed,
    url: &str,
    default_version: &str,
) -> Result<String> {
    let body = fetch(feed, url)?;
    let releases = body
        .as_array()
        .context("Invalid response: expected a list of releases")?;

    let mut latest = clean_or_passthrough(default_version);
    for tag in releases.iter().filter_map(tag_name) {
        let Some(cleaned) = clean(tag) else {
            debug!(%tag, "Skipping unparseable release tag");
            continue;
        };
        if cleaned.contains("rc") {
            continue;
        }
        if greater_than(&cleaned, &latest) {
            latest = cleaned;
        }
    }

    Ok(format!("v{}", latest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    const DEFAULT: &str = "v3.10.2";

    struct FakeFeed {
        response: Option<FeedResponse>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeFeed {
        fn ok(body: Value) -> Self {
            Self::with(Some(FeedResponse { status: 200, body: Some(body) }))
        }

        fn with(response: Option<FeedResponse>) -> Self {
            Self { response, requested: RefCell::new(Vec::new()) }
        }
    }

    impl ReleaseFeed for FakeFeed {
        fn get_json(&self, url: &str) -> Result<FeedResponse> {
            self.requested.borrow_mut().push(url.to_string());
            self.response.clone().ok_or_else(|| anyhow!("connection refused"))
        }
    }

    fn tags(tags: &[&str]) -> Value {
        Value::Array(tags.iter().map(|t| json!({ "tag_name": t })).collect())
    }

    #[test]
    fn test_direct_returns_tag() {
        let feed = FakeFeed::ok(json!({ "tag_name": "v3.11.0", "id": 1 }));
        let resolution = resolve_latest(&feed, LatestStrategy::Direct, "getsops/sops", "sops", DEFAULT);

        assert_eq!(resolution, LatestResolution::Resolved("v3.11.0".to_string()));
        assert_eq!(
            feed.requested.borrow().as_slice(),
            ["https://github.com/getsops/sops/releases/latest"]
        );
    }

    #[test]
    fn test_direct_falls_back_on_failures() {
        let failures = [
            FakeFeed::with(None),
            FakeFeed::with(Some(FeedResponse { status: 404, body: Some(json!({})) })),
            FakeFeed::with(Some(FeedResponse { status: 200, body: None })),
            FakeFeed::ok(json!({ "name": "no tag here" })),
            FakeFeed::ok(json!({ "tag_name": "" })),
        ];

        for feed in failures {
            let resolution = resolve_latest(&feed, LatestStrategy::Direct, "getsops/sops", "sops", DEFAULT);
            match resolution {
                LatestResolution::FallenBack { version, reason } => {
                    assert_eq!(version, DEFAULT);
                    assert!(reason.contains("https://github.com/getsops/sops/releases/latest"));
                }
                other => panic!("expected fallback, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_fallback_reason_carries_cause() {
        let feed = FakeFeed::with(None);
        let resolution = resolve_latest(&feed, LatestStrategy::Direct, "getsops/sops", "sops", DEFAULT);

        match resolution {
            LatestResolution::FallenBack { reason, .. } => {
                assert!(reason.contains("connection refused"), "reason: {}", reason);
            }
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_enumerate_excludes_rc_and_respects_floor() {
        let feed = FakeFeed::ok(tags(&["v3.9.0", "v3.10.2-rc1", "v3.10.1"]));
        let resolution = resolve_latest(&feed, LatestStrategy::Enumerate, "getsops/sops", "sops", DEFAULT);

        assert_eq!(resolution, LatestResolution::Resolved("v3.10.2".to_string()));
        assert_eq!(
            feed.requested.borrow().as_slice(),
            ["https://api.github.com/repos/getsops/sops/releases"]
        );
    }

    #[test]
    fn test_enumerate_picks_highest() {
        let feed = FakeFeed::ok(tags(&["v3.11.0", "not-semver", "v3.12.0-rc.2", "v3.11.4", "3.10.9"]));
        let resolution = resolve_latest(&feed, LatestStrategy::Enumerate, "getsops/sops", "sops", DEFAULT);

        assert_eq!(resolution.version(), "v3.11.4");
    }

    #[test]
    fn test_enumerate_rc_filter_is_substring_based() {
        let feed = FakeFeed::ok(tags(&["v4.0.0-arcane"]));
        let resolution = resolve_latest(&feed, LatestStrategy::Enumerate, "getsops/sops", "sops", DEFAULT);

        assert_eq!(resolution.version(), "v3.10.2");
    }

    #[test]
    fn test_enumerate_falls_back_on_failures() {
        let failures = [
            FakeFeed::with(None),
            FakeFeed::with(Some(FeedResponse { status: 403, body: None })),
            FakeFeed::ok(json!({ "message": "rate limited" })),
        ];

        for feed in failures {
            let resolution = resolve_latest(&feed, LatestStrategy::Enumerate, "getsops/sops", "sops", DEFAULT);
            assert!(matches!(resolution, LatestResolution::FallenBack { .. }));
            assert_eq!(resolution.version(), DEFAULT);
        }
    }
}
