// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Production host capabilities.
//!
//! Backs every capability trait with real side effects: external processes
//! for the package manager, installers, and systemd, and the local
//! filesystem for configuration files. Package installs go through sudo,
//! since hostprep runs as the operator account, not root.

use crate::{
    host::{
        git::GitClient, syscall_non_interactive, CommandRunner, FileTree, PackageInstaller,
        Result, ServiceManager, VersionControl,
    },
    linefile,
};

use std::{fs, path::Path};
use tracing::{debug, info, instrument};

/// Host capabilities backed by the live system.
#[derive(Debug, Default)]
pub struct SystemHost {
    git: GitClient,
}

impl SystemHost {
    /// Construct new system host.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PackageInstaller for SystemHost {
    #[instrument(skip(self), level = "debug")]
    fn install(&mut self, packages: &[&str]) -> Result<()> {
        info!("install packages: {}", packages.join(" "));
        let mut args = vec!["apt-get", "install", "-y"];
        args.extend_from_slice(packages);
        syscall_non_interactive("sudo", args)?;

        Ok(())
    }
}

impl CommandRunner for SystemHost {
    fn check(&mut self, program: &str, args: &[&str]) -> Result<String> {
        debug!("run {program} {}", args.join(" "));
        syscall_non_interactive(program, args)
    }

    #[instrument(skip(self, script), level = "debug")]
    fn run_shell(&mut self, script: &str) -> Result<String> {
        debug!("run shell snippet:\n{script}");
        syscall_non_interactive("bash", ["-c", script])
    }
}

impl FileTree for SystemHost {
    fn ensure_line(&mut self, path: &Path, line: &str) -> Result<bool> {
        Ok(linefile::ensure_line(path, line)?)
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            mkdirp::mkdirp(parent)?;
        }
        fs::write(path, contents)?;

        Ok(())
    }

    fn read_file(&mut self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }

    fn create_dir(&mut self, path: &Path) -> Result<()> {
        mkdirp::mkdirp(path)?;

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

impl ServiceManager for SystemHost {
    #[instrument(skip(self), level = "debug")]
    fn enable_user_unit(&mut self, unit: &str) -> Result<()> {
        info!("enable user unit {unit}");
        syscall_non_interactive("systemctl", ["--user", "enable", "--now", unit])?;

        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    fn enable_linger(&mut self) -> Result<()> {
        info!("enable lingering for invoking user");
        syscall_non_interactive("loginctl", ["enable-linger"])?;

        Ok(())
    }
}

impl VersionControl for SystemHost {
    fn clone_repo(&mut self, url: &str, dest: &Path) -> Result<()> {
        self.git.clone_repo(url, dest)
    }
}
