// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Storage-driver detection and repair.
//!
//! On hosts without kernel overlay support for rootless users, Podman falls
//! back to the `vfs` graph driver, which copies entire layers and is far too
//! slow for real workloads. The remediation is to install fuse-overlayfs,
//! point the storage configuration at the `overlay` driver with
//! fuse-overlayfs as the mount helper, and reset Podman's storage state so
//! the new driver takes effect.
//!
//! The active driver is read out of `podman info --debug`, whose report
//! carries a `graphDriverName` field.

use crate::{
    host::{Host, Result},
    path,
};

use tracing::{info, warn};

/// Storage configuration selecting fuse-overlayfs backed overlay.
pub const OVERLAY_STORAGE_CONF: &str = r#"[storage]
driver = "overlay"

[storage.options.overlay]
mount_program = "/usr/bin/fuse-overlayfs"
"#;

/// Extract the active graph driver from a `podman info --debug` report.
pub fn parse_graph_driver(report: &str) -> Option<String> {
    report.lines().find_map(|line| {
        line.trim()
            .strip_prefix("graphDriverName:")
            .map(|value| value.trim().to_string())
    })
}

/// Detect a `vfs` storage driver and switch the host to overlay.
///
/// Any driver other than `vfs` is left alone; the remediation branch does
/// not execute. A storage reset wipes existing containers and images, which
/// is acceptable on a freshly provisioned host.
///
/// # Errors
///
/// - Return [`HostError`](crate::host::HostError) if the driver cannot be
///   queried, fuse-overlayfs cannot be installed or verified, the storage
///   configuration cannot be written, or the reset fails.
pub fn repair_storage(host: &mut dyn Host) -> Result<()> {
    let report = host.check("podman", &["info", "--debug"])?;
    let driver = parse_graph_driver(&report).unwrap_or_default();

    if driver != "vfs" {
        info!("storage driver {driver:?} needs no repair");
        return Ok(());
    }

    warn!("storage driver is vfs, switching to fuse-overlayfs backed overlay");
    host.install(&["fuse-overlayfs"])?;
    let version = host.check("fuse-overlayfs", &["--version"])?;
    info!("{version}");

    host.write_file(&path::storage_conf_path(), OVERLAY_STORAGE_CONF)?;
    host.check("podman", &["system", "reset", "--force"])?;

    Ok(())
}
