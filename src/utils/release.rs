use super::platform::{Os, Platform};
use super::{less_than, to_tag};

/// Releases before this ship linux/darwin binaries without an arch suffix.
pub const UNIX_ARCH_SUFFIX_SINCE: &str = "3.8.0";
/// Releases before this ship a single `.exe` without an arch token.
pub const WINDOWS_ARCH_SUFFIX_SINCE: &str = "3.9.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub filename: String,
    pub url: String,
}

/// Asset name as published on the release page, e.g. `sops-v3.10.2.linux.amd64`.
///
/// The version token is always tag-prefixed. Versions that are not semver
/// compare as neither older nor newer, so they get the current naming.
pub fn filename(tool: &str, version: &str, platform: &Platform) -> String {
    let tag = to_tag(version);
    let arch = platform.arch.as_str();

    match platform.os {
        Os::Linux | Os::Darwin => {
            let os = platform.os.as_str();
            if less_than(&tag, UNIX_ARCH_SUFFIX_SINCE) {
                format!("{}-{}.{}", tool, tag, os)
            } else {
                format!("{}-{}.{}.{}", tool, tag, os, arch)
            }
        }
        Os::Windows => {
            if less_than(&tag, WINDOWS_ARCH_SUFFIX_SINCE) {
                format!("{}-{}.exe", tool, tag)
            } else {
                format!("{}-{}.{}.exe", tool, tag, arch)
            }
        }
    }
}

pub fn download_url(repo: &str, tool: &str, version: &str, platform: &Platform) -> String {
    format!(
        "https://github.com/{}/releases/download/{}/{}",
        repo,
        to_tag(version),
        filename(tool, version, platform)
    )
}

pub fn asset(repo: &str, tool: &str, version: &str, platform: &Platform) -> ReleaseAsset {
    ReleaseAsset {
        filename: filename(tool, version, platform),
        url: download_url(repo, tool, version, platform),
    }
}
