// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT


use hostprep::{
    host::{
        CommandRunner, FileTree, PackageInstaller, Result as HostResult, ServiceManager,
        VersionControl,
    },
    prompt::Result as PromptResult,
    HostError, OperatorInput, OperatorPrompt, ProvisionProfile,
};

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

/// Recording fake for the whole host capability layer.
///
/// Side effects land in an in-memory call log and file map instead of on the
/// machine running the tests. Commands named in `failing` report nonzero
/// exit; `podman info --debug` reports the configured graph driver.
pub(crate) struct FakeHost {
    pub(crate) log: Vec<String>,
    pub(crate) files: BTreeMap<PathBuf, String>,
    pub(crate) existing: HashSet<PathBuf>,
    pub(crate) failing: HashSet<String>,
    pub(crate) graph_driver: String,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self {
            log: Vec::new(),
            files: BTreeMap::new(),
            existing: HashSet::new(),
            failing: HashSet::new(),
            graph_driver: "overlay".into(),
        }
    }

    pub(crate) fn with_graph_driver(mut self, driver: impl Into<String>) -> Self {
        self.graph_driver = driver.into();
        self
    }

    pub(crate) fn fail_command(mut self, program: impl Into<String>) -> Self {
        self.failing.insert(program.into());
        self
    }

    pub(crate) fn ran(&self, needle: &str) -> bool {
        self.log.iter().any(|entry| entry.contains(needle))
    }

    fn fail(&self, command: &str) -> HostError {
        HostError::CommandFailed {
            command: command.into(),
            message: "scripted failure".into(),
        }
    }
}

impl PackageInstaller for FakeHost {
    fn install(&mut self, packages: &[&str]) -> HostResult<()> {
        self.log.push(format!("install {}", packages.join(" ")));
        if let Some(package) = packages.iter().find(|pkg| self.failing.contains(**pkg)) {
            return Err(self.fail(package));
        }

        Ok(())
    }
}

impl CommandRunner for FakeHost {
    fn check(&mut self, program: &str, args: &[&str]) -> HostResult<String> {
        self.log.push(format!("check {program} {}", args.join(" ")));
        if self.failing.contains(program) {
            return Err(self.fail(program));
        }

        if program == "podman" && args.first() == Some(&"info") {
            return Ok(format!("store:\n  graphDriverName: {}", self.graph_driver));
        }

        Ok(String::new())
    }

    fn run_shell(&mut self, script: &str) -> HostResult<String> {
        self.log.push(format!("shell {script}"));
        let scripted = self
            .failing
            .iter()
            .find(|cmd| script.contains(cmd.as_str()))
            .cloned();
        if let Some(command) = scripted {
            return Err(self.fail(command.as_str()));
        }

        Ok(String::new())
    }
}

impl FileTree for FakeHost {
    fn ensure_line(&mut self, path: &Path, line: &str) -> HostResult<bool> {
        self.log.push(format!("ensure {:?} {line}", path.display()));
        let contents = self.files.entry(path.to_path_buf()).or_default();
        if contents.lines().any(|existing| existing == line) {
            return Ok(false);
        }

        contents.push_str(line);
        contents.push('\n');

        Ok(true)
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> HostResult<()> {
        self.log.push(format!("write {:?}", path.display()));
        self.files.insert(path.to_path_buf(), contents.into());

        Ok(())
    }

    fn read_file(&mut self, path: &Path) -> HostResult<String> {
        if let Some(contents) = self.files.get(path) {
            return Ok(contents.clone());
        }

        // Generated key material is faked rather than tracked.
        if path.extension().is_some_and(|ext| ext == "pub") {
            return Ok("ssh-ed25519 AAAAfakefakefake operator@test\n".into());
        }

        Err(HostError::Io(std::io::Error::from(
            std::io::ErrorKind::NotFound,
        )))
    }

    fn create_dir(&mut self, path: &Path) -> HostResult<()> {
        self.log.push(format!("mkdir {:?}", path.display()));

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.existing.contains(path) || self.files.contains_key(path)
    }
}

impl ServiceManager for FakeHost {
    fn enable_user_unit(&mut self, unit: &str) -> HostResult<()> {
        self.log.push(format!("enable-unit {unit}"));

        Ok(())
    }

    fn enable_linger(&mut self) -> HostResult<()> {
        self.log.push("enable-linger".into());

        Ok(())
    }
}

impl VersionControl for FakeHost {
    fn clone_repo(&mut self, url: &str, dest: &Path) -> HostResult<()> {
        self.log.push(format!("clone {url} {:?}", dest.display()));

        Ok(())
    }
}

/// Prompt fake with a scripted go/no-go answer.
pub(crate) struct ScriptedPrompt {
    pub(crate) answer: bool,
    pub(crate) pauses: usize,
}

impl ScriptedPrompt {
    pub(crate) fn answering(answer: bool) -> Self {
        Self { answer, pauses: 0 }
    }
}

impl OperatorPrompt for ScriptedPrompt {
    fn confirm(&mut self, _: &str) -> PromptResult<bool> {
        Ok(self.answer)
    }

    fn pause(&mut self, _: &str) -> PromptResult<()> {
        self.pauses += 1;

        Ok(())
    }
}

pub(crate) fn operator_profile() -> ProvisionProfile {
    ProvisionProfile {
        operator: OperatorInput {
            email: "operator@test".into(),
            project: "widget-api".into(),
            github_user: "operator".into(),
        },
        ..Default::default()
    }
}
