use crate::cache::ToolCache;
use crate::error::{Result, SetupError};
use crate::utils::platform::Platform;
use crate::utils::release;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Deepest directory level searched when a cached entry nests its binary.
pub const MAX_WALK_DEPTH: usize = 16;

/// Fetches a release binary into the tool cache and locates it there.
///
/// Concurrent acquisitions of the same version are not coordinated; the
/// cache implementation decides what happens if two runs race.
pub struct BinaryAcquirer<C: ToolCache> {
    cache: C,
    repo: String,
    tool: String,
}

impl<C: ToolCache> BinaryAcquirer<C> {
    pub fn new(cache: C, repo: &str, tool: &str) -> Self {
        Self {
            cache,
            repo: repo.to_string(),
            tool: tool.to_string(),
        }
    }

    /// Returns the path of the cached executable for `version`, which must
    /// already be in tag form. Downloads only on a cache miss.
    pub fn acquire(&self, version: &str, platform: &Platform) -> Result<PathBuf> {
        let binary = format!("{}{}", self.tool, platform.executable_extension());

        let cached_dir = match self.cache.find(&self.tool, version) {
            Some(dir) => dir,
            None => self.download(&binary, version, platform)?,
        };

        let dir = self
            .cache
            .find(&self.tool, version)
            .ok_or_else(|| SetupError::BinaryNotFound {
                binary: binary.clone(),
                path: cached_dir.clone(),
            })?;

        let direct = dir.join(&binary);
        let path = if direct.is_file() {
            direct
        } else {
            debug!(dir = %dir.display(), %binary, "Binary not at cache root, searching");
            find_binary(&dir, &binary).ok_or_else(|| SetupError::BinaryNotFound {
                binary: binary.clone(),
                path: dir.clone(),
            })?
        };

        make_executable(&path)?;
        Ok(path)
    }

    fn download(&self, binary: &str, version: &str, platform: &Platform) -> Result<PathBuf> {
        let url = release::download_url(&self.repo, &self.tool, version, platform);
        info!(%url, "Downloading {} {}", self.tool, version);

        let download_path =
            self.cache
                .download_tool(&url)
                .map_err(|e| SetupError::DownloadFailed {
                    binary: binary.to_string(),
                    url: url.clone(),
                    cause: format!("{:#}", e),
                })?;

        make_executable(&download_path)?;

        self.cache
            .cache_file(&download_path, binary, &self.tool, version)
            .map_err(|e| SetupError::CacheFailed {
                binary: binary.to_string(),
                cause: format!("{:#}", e),
            })
    }
}

/// Depth-first search below `root` for a regular file called `name`.
/// Entries are visited in name order and symlinks are not followed.
pub fn find_binary(root: &Path, name: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .max_depth(MAX_WALK_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .find(|entry| entry.file_type().is_file() && entry.file_name() == name)
        .map(walkdir::DirEntry::into_path)
}

/// Opens the file up to mode 0777. Release binaries often arrive without
/// the execute bit.
pub fn make_executable(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path)?.permissions();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(0o777);
    }

    #[cfg(not(unix))]
    {
        perms.set_readonly(false);
    }

    fs::set_permissions(path, perms)?;
    Ok(())
}
