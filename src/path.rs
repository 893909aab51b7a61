// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine relevant path information for the host files that need to be
//! interacted with, or managed in some way.

use std::path::PathBuf;

/// Determine absolute path to user's home directory.
///
/// Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(NoWayHome)
}

/// Default location for the generated SSH keypair.
///
/// Falls back to an unexpanded tilde path when the home directory cannot be
/// determined, leaving expansion to profile parsing.
pub fn default_ssh_key_path() -> PathBuf {
    dirs::home_dir()
        .map(|path| path.join(".ssh").join("id_ed25519"))
        .unwrap_or_else(|| PathBuf::from("~/.ssh/id_ed25519"))
}

/// Shell startup files that receive configuration lines.
///
/// Both bash and zsh startup files are managed so the operator lands in a
/// working shell either way. Does not check if the paths returned actually
/// exist.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn shell_startup_files() -> Result<Vec<PathBuf>> {
    let home = home_dir()?;
    Ok(vec![home.join(".bashrc"), home.join(".zshrc")])
}

/// Per-user container engine configuration directory.
///
/// Uses XDG Base Directory path `$XDG_CONFIG_HOME/containers`. Does not
/// check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
///
/// # See Also
///
/// - [XDG Base Directory](https://wiki.archlinux.org/title/XDG_Base_Directory)
pub fn containers_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|path| path.join("containers"))
        .ok_or(NoWayHome)
}

/// System-wide container storage configuration file.
pub fn storage_conf_path() -> PathBuf {
    PathBuf::from("/etc/containers/storage.conf")
}

/// Kernel parameter configuration file.
pub fn sysctl_conf_path() -> PathBuf {
    PathBuf::from("/etc/sysctl.conf")
}

/// No way to determine user's home directory.
///
/// # See Also
///
/// - [`dirs::home_dir`](https://docs.rs/dirs/latest/dirs/fn.home_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's home directory")]
pub struct NoWayHome;

/// Friendly result alias :3
pub type Result<T, E = NoWayHome> = std::result::Result<T, E>;
