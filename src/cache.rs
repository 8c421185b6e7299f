//! On-disk tool cache keyed by tool name and version.
//!
//! Layout: `<root>/<tool>/<version>/<os>-<arch>/<file>`, with a sibling
//! `<os>-<arch>.complete` marker written once the entry is fully populated.
//! Entries are never evicted here.

use crate::utils::download::HttpClient;
use crate::utils::platform::Platform;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub trait ToolCache {
    /// Directory holding the cached entry, if complete.
    fn find(&self, tool: &str, version: &str) -> Option<PathBuf>;

    /// Downloads `url` to a fresh temporary file and returns its path.
    fn download_tool(&self, url: &str) -> Result<PathBuf>;

    /// Moves `source` into the cache as `dest_filename` and returns the
    /// entry directory.
    fn cache_file(&self, source: &Path, dest_filename: &str, tool: &str, version: &str)
        -> Result<PathBuf>;
}

pub struct FsToolCache {
    root: PathBuf,
    temp_dir: PathBuf,
    platform_key: String,
    client: HttpClient,
}

impl FsToolCache {
    /// Entries are kept apart per platform so an `--os` override never
    /// reuses another OS's binary.
    pub fn new(root: PathBuf, temp_dir: PathBuf, platform: &Platform, client: HttpClient) -> Self {
        Self {
            root,
            temp_dir,
            platform_key: platform.cache_key(),
            client,
        }
    }

    fn version_dir(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join(tool).join(version)
    }

    fn entry_dir(&self, tool: &str, version: &str) -> PathBuf {
        self.version_dir(tool, version).join(&self.platform_key)
    }

    fn marker(&self, tool: &str, version: &str) -> PathBuf {
        self.version_dir(tool, version)
            .join(format!("{}.complete", self.platform_key))
    }
}

impl ToolCache for FsToolCache {
    fn find(&self, tool: &str, version: &str) -> Option<PathBuf> {
        let dir = self.entry_dir(tool, version);
        if self.marker(tool, version).is_file() && dir.is_dir() {
            debug!(%tool, %version, path = %dir.display(), "Found in tool cache");
            Some(dir)
        } else {
            None
        }
    }

    fn download_tool(&self, url: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.temp_dir)?;

        let (_, dest) = tempfile::Builder::new()
            .prefix("download-")
            .tempfile_in(&self.temp_dir)?
            .keep()
            .context("Failed to persist temporary download file")?;

        if let Err(e) = self.client.download_file(url, &dest) {
            let _ = fs::remove_file(&dest);
            return Err(e);
        }

        Ok(dest)
    }

    fn cache_file(
        &self,
        source: &Path,
        dest_filename: &str,
        tool: &str,
        version: &str,
    ) -> Result<PathBuf> {
        let dir = self.entry_dir(tool, version);
        let marker = self.marker(tool, version);

        if marker.exists() {
            fs::remove_file(&marker)?;
        }
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;

        let dest = dir.join(dest_filename);
        // rename fails across filesystems, e.g. RUNNER_TEMP on another mount
        if fs::rename(source, &dest).is_err() {
            fs::copy(source, &dest).with_context(|| {
                format!("Failed to copy {} into {}", source.display(), dest.display())
            })?;
            fs::remove_file(source)?;
        }

        fs::write(&marker, "")?;
        debug!(%tool, %version, path = %dir.display(), "Cached tool");

        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::platform::resolve;
    use tempfile::TempDir;

    fn cache_for(temp: &TempDir, os: &str, arch: &str) -> FsToolCache {
        FsToolCache::new(
            temp.path().join("cache"),
            temp.path().join("tmp"),
            &resolve(os, arch).unwrap(),
            HttpClient::new().unwrap(),
        )
    }

    fn cache(temp: &TempDir) -> FsToolCache {
        cache_for(temp, "Linux", "X64")
    }

    #[test]
    fn test_find_misses_empty_cache() {
        let temp = TempDir::new().unwrap();
        assert!(cache(&temp).find("sops", "v3.10.2").is_none());
    }

    #[test]
    fn test_cache_file_then_find() {
        let temp = TempDir::new().unwrap();
        let cache = cache(&temp);

        let source = temp.path().join("download");
        fs::write(&source, b"binary").unwrap();

        let dir = cache.cache_file(&source, "sops", "sops", "v3.10.2").unwrap();
        assert_eq!(dir, temp.path().join("cache/sops/v3.10.2/linux-amd64"));
        assert_eq!(fs::read(dir.join("sops")).unwrap(), b"binary");
        assert!(!source.exists());

        assert_eq!(cache.find("sops", "v3.10.2"), Some(dir));
        assert!(cache.find("sops", "v3.9.0").is_none());
    }

    #[test]
    fn test_incomplete_entry_is_a_miss() {
        let temp = TempDir::new().unwrap();
        let cache = cache(&temp);

        let dir = temp.path().join("cache/sops/v3.10.2/linux-amd64");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("sops"), b"partial").unwrap();

        assert!(cache.find("sops", "v3.10.2").is_none());
    }

    #[test]
    fn test_cache_file_replaces_existing_entry() {
        let temp = TempDir::new().unwrap();
        let cache = cache(&temp);

        let first = temp.path().join("first");
        fs::write(&first, b"old").unwrap();
        let dir = cache.cache_file(&first, "sops-old", "sops", "v3.10.2").unwrap();

        let second = temp.path().join("second");
        fs::write(&second, b"new").unwrap();
        cache.cache_file(&second, "sops", "sops", "v3.10.2").unwrap();

        assert!(!dir.join("sops-old").exists());
        assert_eq!(fs::read(dir.join("sops")).unwrap(), b"new");
    }

    #[test]
    fn test_platforms_share_a_version_without_colliding() {
        let temp = TempDir::new().unwrap();
        let linux = cache_for(&temp, "Linux", "X64");
        let windows = cache_for(&temp, "Windows", "X64");

        let source = temp.path().join("linux-download");
        fs::write(&source, b"elf").unwrap();
        let linux_dir = linux.cache_file(&source, "sops", "sops", "v3.10.2").unwrap();

        assert!(windows.find("sops", "v3.10.2").is_none());

        let source = temp.path().join("windows-download");
        fs::write(&source, b"pe").unwrap();
        let windows_dir = windows.cache_file(&source, "sops.exe", "sops", "v3.10.2").unwrap();

        assert_ne!(linux_dir, windows_dir);
        assert_eq!(linux.find("sops", "v3.10.2"), Some(linux_dir.clone()));
        assert_eq!(windows.find("sops", "v3.10.2"), Some(windows_dir.clone()));
        assert_eq!(fs::read(linux_dir.join("sops")).unwrap(), b"elf");
        assert_eq!(fs::read(windows_dir.join("sops.exe")).unwrap(), b"pe");
    }
}
