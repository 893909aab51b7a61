// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Provision a fresh Debian host for rootless Podman workloads.
//!
//! Hostprep replaces a pile of near-duplicate provisioning shell scripts
//! with one sequencer: validate the operator inputs, confirm the plan, then
//! execute a fixed ordered list of provisioning steps. Verification steps
//! abort the run on failure; everything else is best-effort. All host
//! mutations are idempotent, so re-running on an already provisioned host
//! duplicates nothing.
//!
//! External collaborators (the package manager, network installers, systemd,
//! the version-control client) live behind the capability traits in
//! [`host`], which is what makes the sequencer testable without a real
//! Debian host.

pub mod config;
pub mod host;
pub mod linefile;
pub mod path;
pub mod prompt;
pub mod sequence;
pub mod storage;

pub use config::{ConfigError, OperatorInput, ProvisionOptions, ProvisionProfile};
pub use host::{Host, HostError, SystemHost};
pub use prompt::{InquirePrompt, OperatorPrompt};
pub use sequence::{plan::provisioning_plan, Criticality, SequenceError, Sequencer, StepSpec};
