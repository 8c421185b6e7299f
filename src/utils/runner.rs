//! Workflow-runner side of a run: step outputs, the job `PATH`, and
//! annotation lines on stdout.

use anyhow::{bail, Context, Result};
use std::env;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct Runner {
    output_file: Option<PathBuf>,
    path_file: Option<PathBuf>,
}

impl Runner {
    pub fn new(output_file: Option<PathBuf>, path_file: Option<PathBuf>) -> Self {
        Self {
            output_file,
            path_file,
        }
    }

    pub fn from_env() -> Self {
        let file = |name: &str| {
            env::var_os(name)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        };

        Self::new(file("GITHUB_OUTPUT"), file("GITHUB_PATH"))
    }

    pub fn set_output(&self, name: &str, value: &str) -> Result<()> {
        if value.contains('\n') || name.contains('=') {
            bail!("Cannot write output {:?}: multi-line values are not supported", name);
        }

        match &self.output_file {
            Some(file) => append_line(file, &format!("{}={}", name, value)),
            None => {
                println!("::set-output name={}::{}", name, value);
                Ok(())
            }
        }
    }

    /// Makes `dir` visible to later steps and to this process.
    pub fn add_path(&self, dir: &Path) -> Result<()> {
        if let Some(file) = &self.path_file {
            append_line(file, &dir.to_string_lossy())?;
        } else {
            println!("::add-path::{}", dir.display());
        }

        let mut paths = vec![dir.to_path_buf()];
        if let Some(current) = env::var_os("PATH") {
            paths.extend(env::split_paths(&current));
        }
        let joined: OsString = env::join_paths(paths).context("Failed to extend PATH")?;
        env::set_var("PATH", joined);

        Ok(())
    }
}

fn append_line(file: &Path, line: &str) -> Result<()> {
    let mut handle = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    writeln!(handle, "{}", line)?;
    Ok(())
}

fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub fn warning(message: &str) {
    println!("::warning::{}", escape_data(message));
}

pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
}
