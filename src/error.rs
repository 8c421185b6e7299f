use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Unsupported OS found. OS: {os} Arch: {arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Failed to download {binary} from location {url}. Error: {cause}")]
    DownloadFailed {
        binary: String,
        url: String,
        cause: String,
    },

    #[error("Failed to cache {binary}: {cause}")]
    CacheFailed { binary: String, cause: String },

    #[error("{binary} executable not found in path {}", path.display())]
    BinaryNotFound { binary: String, path: PathBuf },

    /// Never surfaced to the caller; carried inside a fallback resolution.
    #[error("Cannot get the latest {tool} info from {url}: {reason}")]
    FeedLookupFailed {
        tool: String,
        url: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SetupError>;
