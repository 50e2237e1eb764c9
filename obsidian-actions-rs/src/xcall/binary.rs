//! Locating and running the `xcall` helper.
//!
//! `xcall` (https://github.com/martinfinke/xcall) turns the x-success and
//! x-error callbacks of the x-callback-url protocol into stdout and stderr.

use crate::error::{Result, VaultError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const XCALL: &str = "xcall";
const BUNDLE_BINARY: &str = "xcall.app/Contents/MacOS/xcall";

/// Captured output of one helper invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Reply {
    /// A successful reply carrying `stdout`.
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// A failed reply carrying `stderr`.
    pub fn failure(stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }
}

/// Something that can deliver an x-callback-url and hand back the reply.
pub trait Transport: fmt::Debug {
    fn send(&self, url: &str) -> Result<Reply>;
}

/// Transport that shells out to the `xcall` binary.
#[derive(Debug, Clone)]
pub struct XCall {
    binary: PathBuf,
}

impl XCall {
    /// Find the `xcall` binary.
    ///
    /// Checked in order:
    /// - `xcall` on the search path
    /// - `/Applications/xcall.app/Contents/MacOS/xcall`
    /// - `~/Applications/xcall.app/Contents/MacOS/xcall`
    pub fn locate() -> Result<Self> {
        if let Ok(path) = which::which(XCALL) {
            debug!(path = %path.display(), "found xcall on the search path");
            return Ok(Self { binary: path });
        }

        for candidate in bundle_candidates() {
            if candidate.exists() {
                debug!(path = %candidate.display(), "found xcall application bundle");
                return Self::with_binary(candidate);
            }
        }

        Err(VaultError::ExecutableNotFound(
            "has xcall.app been installed from https://github.com/martinfinke/xcall?".to_string(),
        ))
    }

    /// Use an explicit binary, which must be an executable file.
    pub fn with_binary(path: impl Into<PathBuf>) -> Result<Self> {
        let binary = path.into();
        if !binary.exists() {
            return Err(VaultError::ExecutableNotFound(format!(
                "{} does not exist",
                binary.display()
            )));
        }
        if !is_executable(&binary) {
            return Err(VaultError::ExecutableNotFound(format!(
                "{} does not appear to be an executable file",
                binary.display()
            )));
        }
        Ok(Self { binary })
    }

    /// Path of the binary in use.
    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Transport for XCall {
    fn send(&self, url: &str) -> Result<Reply> {
        debug!(%url, "invoking xcall");
        let output = Command::new(&self.binary).arg("-url").arg(url).output()?;
        debug!(
            status = ?output.status.code(),
            stdout_len = output.stdout.len(),
            stderr_len = output.stderr.len(),
            "xcall finished"
        );
        Ok(Reply {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

fn bundle_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![Path::new("/Applications").join(BUNDLE_BINARY)];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join("Applications").join(BUNDLE_BINARY));
    }
    candidates
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
