// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! The fixed provisioning plan.
//!
//! Deduplicated superset of the provisioning checklist: base packages and
//! shell tooling, SSH deploy key, rootless Podman with its compose tool,
//! kernel and engine configuration, the project repository, Node.js through
//! nvm, and the Hasura CLI. Installation-verification steps are the checked
//! tier; everything else is best-effort.
//!
//! Every file mutation in the plan goes through the idempotent writer or an
//! exists-check, so re-running the plan on an already provisioned host is
//! safe and duplicates nothing.

use crate::{
    config::ProvisionProfile,
    host::Host,
    path,
    sequence::{Criticality, StepSpec},
    storage,
};

use tracing::info;

/// Fixed engine configuration for rootless Podman.
pub const CONTAINERS_CONF: &str = r#"[containers]
log_driver = "k8s-file"

[engine]
compose_warning_logs = false
"#;

const NVM_INSTALLER: &str =
    "curl -fsSL https://raw.githubusercontent.com/nvm-sh/nvm/v0.40.1/install.sh | bash";

const OH_MY_ZSH_INSTALLER: &str =
    "curl -fsSL https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh \
     | RUNZSH=no CHSH=no sh";

const HASURA_INSTALLER: &str =
    "curl -fsSL https://raw.githubusercontent.com/hasura/graphql-engine/stable/cli/get.sh | bash";

const NVM_INIT_LINES: [&str; 2] = [
    r#"export NVM_DIR="$HOME/.nvm""#,
    r#"[ -s "$NVM_DIR/nvm.sh" ] && \. "$NVM_DIR/nvm.sh""#,
];

/// Build the provisioning plan, in execution order.
pub fn provisioning_plan() -> Vec<StepSpec> {
    use Criticality::{BestEffort, Fatal};

    let step = |name: &'static str, criticality: Criticality, run: crate::sequence::StepFn| {
        StepSpec {
            name,
            criticality,
            run,
        }
    };

    vec![
        step("install-base-packages", BestEffort, install_base_packages),
        step("install-oh-my-zsh", BestEffort, install_oh_my_zsh),
        step("configure-shell-startup", BestEffort, configure_shell_startup),
        step("generate-ssh-key", BestEffort, generate_ssh_key),
        step("install-podman", BestEffort, install_podman),
        step("install-podman-compose", BestEffort, install_podman_compose),
        step("verify-podman-compose", Fatal, verify_podman_compose),
        step("open-privileged-ports", BestEffort, open_privileged_ports),
        step("write-containers-conf", BestEffort, write_containers_conf),
        step("repair-storage-driver", Fatal, repair_storage_driver),
        step("enable-podman-services", BestEffort, enable_podman_services),
        step("clone-project-repository", BestEffort, clone_project_repository),
        step("install-nvm", Fatal, install_nvm),
        step("install-node", Fatal, install_node),
        step("install-hasura-cli", BestEffort, install_hasura_cli),
        step("verify-hasura-cli", Fatal, verify_hasura_cli),
    ]
}

fn install_base_packages(host: &mut dyn Host, _: &ProvisionProfile) -> crate::host::Result<()> {
    host.install(&["zsh", "git", "curl", "ca-certificates"])
}

fn install_oh_my_zsh(host: &mut dyn Host, _: &ProvisionProfile) -> crate::host::Result<()> {
    let oh_my_zsh = path::home_dir()?.join(".oh-my-zsh");
    if host.exists(&oh_my_zsh) {
        info!("oh-my-zsh already installed, skipping");
        return Ok(());
    }

    host.run_shell(OH_MY_ZSH_INSTALLER)?;

    Ok(())
}

fn configure_shell_startup(
    host: &mut dyn Host,
    profile: &ProvisionProfile,
) -> crate::host::Result<()> {
    for rc in path::shell_startup_files()? {
        host.ensure_line(&rc, r#"export PATH="$HOME/.local/bin:$PATH""#)?;
        if profile.options.setup_aliases {
            host.ensure_line(&rc, "alias docker=podman")?;
            host.ensure_line(&rc, "alias ll='ls -alF'")?;
        }
    }

    Ok(())
}

fn generate_ssh_key(host: &mut dyn Host, profile: &ProvisionProfile) -> crate::host::Result<()> {
    let key = &profile.options.ssh_key_path;
    if host.exists(key) {
        info!("ssh key {:?} already exists, skipping keygen", key.display());
    } else {
        if let Some(parent) = key.parent() {
            host.create_dir(parent)?;
        }
        let key_path = key.to_string_lossy();
        host.check(
            "ssh-keygen",
            &[
                "-t",
                "ed25519",
                "-C",
                profile.operator.email.as_str(),
                "-f",
                key_path.as_ref(),
                "-N",
                "",
            ],
        )?;
    }

    let public_key = host.read_file(&key.with_extension("pub"))?;
    info!(
        "add this public key as a deploy key at {}:\n{}",
        profile.deploy_key_url(),
        public_key.trim_end()
    );

    Ok(())
}

fn install_podman(host: &mut dyn Host, _: &ProvisionProfile) -> crate::host::Result<()> {
    host.install(&["podman", "uidmap", "slirp4netns", "dbus-user-session", "pipx"])
}

fn install_podman_compose(host: &mut dyn Host, _: &ProvisionProfile) -> crate::host::Result<()> {
    host.check("pipx", &["install", "podman-compose"])?;

    Ok(())
}

fn verify_podman_compose(host: &mut dyn Host, _: &ProvisionProfile) -> crate::host::Result<()> {
    let version = host.check("podman-compose", &["--version"])?;
    info!("{version}");

    Ok(())
}

fn open_privileged_ports(host: &mut dyn Host, _: &ProvisionProfile) -> crate::host::Result<()> {
    host.ensure_line(
        &path::sysctl_conf_path(),
        "net.ipv4.ip_unprivileged_port_start=80",
    )?;
    host.check("sudo", &["sysctl", "-p"])?;

    Ok(())
}

fn write_containers_conf(host: &mut dyn Host, _: &ProvisionProfile) -> crate::host::Result<()> {
    let dir = path::containers_config_dir()?;
    host.create_dir(&dir)?;
    host.write_file(&dir.join("containers.conf"), CONTAINERS_CONF)?;

    Ok(())
}

fn repair_storage_driver(host: &mut dyn Host, _: &ProvisionProfile) -> crate::host::Result<()> {
    storage::repair_storage(host)
}

fn enable_podman_services(host: &mut dyn Host, _: &ProvisionProfile) -> crate::host::Result<()> {
    host.enable_user_unit("podman.socket")?;
    host.enable_linger()?;

    Ok(())
}

fn clone_project_repository(
    host: &mut dyn Host,
    profile: &ProvisionProfile,
) -> crate::host::Result<()> {
    let dest = profile.clone_dest();
    if host.exists(&dest) {
        info!("{:?} already exists, skipping clone", dest.display());
        return Ok(());
    }

    host.clone_repo(profile.repo_url().as_str(), &dest)
}

fn install_nvm(host: &mut dyn Host, _: &ProvisionProfile) -> crate::host::Result<()> {
    let nvm_script = path::home_dir()?.join(".nvm").join("nvm.sh");
    if !host.exists(&nvm_script) {
        host.run_shell(NVM_INSTALLER)?;
    }

    for rc in path::shell_startup_files()? {
        for line in NVM_INIT_LINES {
            host.ensure_line(&rc, line)?;
        }
    }

    let version = host.run_shell(r#". "$HOME/.nvm/nvm.sh" && nvm --version"#)?;
    info!("nvm {version}");

    Ok(())
}

fn install_node(host: &mut dyn Host, profile: &ProvisionProfile) -> crate::host::Result<()> {
    host.run_shell(
        format!(
            r#". "$HOME/.nvm/nvm.sh" && nvm install {}"#,
            profile.options.node_version
        )
        .as_str(),
    )?;

    let versions =
        host.run_shell(r#". "$HOME/.nvm/nvm.sh" && node --version && npm --version"#)?;
    info!("node/npm {versions}");

    Ok(())
}

fn install_hasura_cli(host: &mut dyn Host, _: &ProvisionProfile) -> crate::host::Result<()> {
    if host.exists(std::path::Path::new("/usr/local/bin/hasura")) {
        info!("hasura cli already installed, skipping");
        return Ok(());
    }

    host.run_shell(HASURA_INSTALLER)?;

    Ok(())
}

fn verify_hasura_cli(host: &mut dyn Host, _: &ProvisionProfile) -> crate::host::Result<()> {
    let version = host.check("hasura", &["version"])?;
    info!("{version}");

    Ok(())
}
