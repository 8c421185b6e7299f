use crate::error::{Result, SetupError};
use std::env;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Amd64,
    Arm64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
        }
    }
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os.as_str(), self.arch.as_str())
    }
}

/// Maps runner-reported OS and architecture names (`RUNNER_OS`,
/// `RUNNER_ARCH`) onto release filename tokens.
///
/// Any architecture starting with `X` (`X86`, `X64`) is `amd64`; everything
/// else is `arm64`.
pub fn resolve(raw_os: &str, raw_arch: &str) -> Result<Platform> {
    let arch = if raw_arch.starts_with('X') {
        Arch::Amd64
    } else {
        Arch::Arm64
    };

    let os = if raw_os.starts_with("Win") {
        Os::Windows
    } else if raw_os.starts_with("Linux") {
        Os::Linux
    } else if raw_os.starts_with("Darwin") || starts_with_ignore_case(raw_os, "macos") {
        Os::Darwin
    } else {
        return Err(SetupError::UnsupportedPlatform {
            os: raw_os.to_string(),
            arch: raw_arch.to_string(),
        });
    };

    Ok(Platform { os, arch })
}

// Runners report `macOS`, so this one prefix ignores case.
fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Runner-style names for the machine this binary was built for, used when
/// the runner variables are not set.
pub fn host_names() -> (&'static str, &'static str) {
    let os = match env::consts::OS {
        "windows" => "Windows",
        "macos" => "macOS",
        "linux" => "Linux",
        other => other,
    };

    let arch = match env::consts::ARCH {
        "x86_64" => "X64",
        "x86" => "X86",
        "aarch64" => "ARM64",
        "arm" => "ARM",
        other => other,
    };

    (os, arch)
}

impl Platform {
    /// Reads `RUNNER_OS` / `RUNNER_ARCH`, falling back to the host platform.
    /// Explicit overrides win over both.
    pub fn detect(os_override: Option<&str>, arch_override: Option<&str>) -> Result<Platform> {
        let (host_os, host_arch) = host_names();

        let raw_os = os_override
            .map(str::to_string)
            .or_else(|| env::var("RUNNER_OS").ok())
            .unwrap_or_else(|| host_os.to_string());
        let raw_arch = arch_override
            .map(str::to_string)
            .or_else(|| env::var("RUNNER_ARCH").ok())
            .unwrap_or_else(|| host_arch.to_string());

        resolve(&raw_os, &raw_arch)
    }

    /// Cache entry name, e.g. `linux-amd64`.
    pub fn cache_key(&self) -> String {
        format!("{}-{}", self.os.as_str(), self.arch.as_str())
    }

    pub fn executable_extension(&self) -> &'static str {
        match self.os {
            Os::Windows => ".exe",
            _ => "",
        }
    }
}
