// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Host capability layer.
//!
//! Every external collaborator the provisioning plan touches is an opaque
//! black box invoked for side effect only: the system package manager,
//! download-and-run installers, systemd, the version-control client, and
//! plain host files. Each one is modeled as a small capability trait so the
//! sequencer can be exercised against fakes without a real Debian host.
//!
//! [`SystemHost`] is the production implementation backed by external
//! processes and the local filesystem.

pub mod git;
pub mod system;

pub use system::SystemHost;

use std::{
    ffi::OsStr,
    path::Path,
    process::Command,
};

/// Install packages through the system package manager.
pub trait PackageInstaller {
    /// Install every named package, erroring if the installer reports failure.
    fn install(&mut self, packages: &[&str]) -> Result<()>;
}

/// Run external commands on the host.
pub trait CommandRunner {
    /// Run a command, capturing its output.
    ///
    /// A nonzero exit status is an error carrying the captured output, so
    /// verification checks can use this directly.
    fn check(&mut self, program: &str, args: &[&str]) -> Result<String>;

    /// Run a shell snippet, the download-and-run installer pattern.
    fn run_shell(&mut self, script: &str) -> Result<String>;
}

/// Mutate files on the host.
pub trait FileTree {
    /// Ensure a configuration line exists in a file exactly once.
    ///
    /// Returns `true` when an append occurred.
    fn ensure_line(&mut self, path: &Path, line: &str) -> Result<bool>;

    /// Write a file with fixed contents, replacing whatever is there.
    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()>;

    /// Read a file into a string.
    fn read_file(&mut self, path: &Path) -> Result<String>;

    /// Create a directory along with any missing parents.
    fn create_dir(&mut self, path: &Path) -> Result<()>;

    /// Check whether a path exists on the host.
    fn exists(&self, path: &Path) -> bool;
}

/// Manage systemd user services.
pub trait ServiceManager {
    /// Enable and start a user unit.
    fn enable_user_unit(&mut self, unit: &str) -> Result<()>;

    /// Let the invoking user's services outlive their login sessions.
    fn enable_linger(&mut self) -> Result<()>;
}

/// Clone repositories from remotes.
pub trait VersionControl {
    /// Clone the repository at `url` into `dest`.
    fn clone_repo(&mut self, url: &str, dest: &Path) -> Result<()>;
}

/// Union of every capability the provisioning plan needs.
pub trait Host:
    PackageInstaller + CommandRunner + FileTree + ServiceManager + VersionControl
{
}

impl<H> Host for H where
    H: PackageInstaller + CommandRunner + FileTree + ServiceManager + VersionControl
{
}

pub(crate) fn syscall_non_interactive(
    cmd: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = impl AsRef<OsStr>>,
) -> Result<String> {
    let output = Command::new(cmd.as_ref()).args(args).output()?;
    let stdout = String::from_utf8_lossy(output.stdout.as_slice()).into_owned();
    let stderr = String::from_utf8_lossy(output.stderr.as_slice()).into_owned();
    let mut message = String::new();

    if !stdout.is_empty() {
        message.push_str(stdout.as_str());
    }

    if !stderr.is_empty() {
        message.push_str(stderr.as_str());
    }

    // INVARIANT: Chomp trailing newlines.
    let message = message
        .strip_suffix("\r\n")
        .or(message.strip_suffix('\n'))
        .map(ToString::to_string)
        .unwrap_or(message);

    if !output.status.success() {
        return Err(HostError::CommandFailed {
            command: cmd.as_ref().to_string_lossy().into_owned(),
            message,
        });
    }

    Ok(message)
}

/// Host capability error types.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// An external command exited with nonzero status.
    #[error("command {command:?} failed:\n{message}")]
    CommandFailed {
        /// Program that was invoked.
        command: String,

        /// Combined stdout/stderr captured from the failed command.
        message: String,
    },

    /// Host file manipulation fails.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Operations from libgit2 fail.
    #[error(transparent)]
    Git2(#[from] git2::Error),

    /// Style template cannot be set for progress bars.
    #[error(transparent)]
    IndicatifStyleTemplate(#[from] indicatif::style::TemplateError),

    /// Path resolution fails.
    #[error(transparent)]
    Path(#[from] crate::path::NoWayHome),
}

/// Friendly result alias :3
pub type Result<T, E = HostError> = std::result::Result<T, E>;
