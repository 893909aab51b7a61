// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Provisioning profile layout.
//!
//! Specify the layout for the profile file that Hostprep uses to simplify
//! the process of serialization and deserialization. File I/O is left to the
//! caller to figure out.

use crate::path;

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::PathBuf,
    str::FromStr,
};

/// Provisioning profile layout.
///
/// Every run of hostprep is driven by a __profile__. The profile carries the
/// operator inputs that the provisioning plan derives host state from, plus
/// the handful of behavioral choices that used to vary between operators
/// (shell aliases, pauses between steps, pinned Node.js version). A profile
/// can be loaded from a TOML file, with individual operator inputs
/// overridden from the command line.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct ProvisionProfile {
    /// Required operator inputs.
    #[serde(default)]
    pub operator: OperatorInput,

    /// Behavioral choices for the provisioning plan.
    #[serde(default)]
    pub options: ProvisionOptions,
}

impl ProvisionProfile {
    /// Verify that all required operator inputs are present and non-empty.
    ///
    /// No format validation is performed beyond presence. Any non-empty
    /// string is accepted for every field.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::MissingInput`] naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        if self.operator.email.trim().is_empty() {
            return Err(ConfigError::MissingInput("email"));
        }

        if self.operator.project.trim().is_empty() {
            return Err(ConfigError::MissingInput("project"));
        }

        if self.operator.github_user.trim().is_empty() {
            return Err(ConfigError::MissingInput("github_user"));
        }

        Ok(())
    }

    /// SSH clone URL for the operator's project repository.
    pub fn repo_url(&self) -> String {
        format!(
            "git@github.com:{}/{}.git",
            self.operator.github_user, self.operator.project
        )
    }

    /// Destination path the project repository gets cloned into.
    pub fn clone_dest(&self) -> PathBuf {
        self.options.clone_base_dir.join(&self.operator.project)
    }

    /// URL of the GitHub deploy key settings page for the project.
    pub fn deploy_key_url(&self) -> String {
        format!(
            "https://github.com/{}/{}/settings/keys",
            self.operator.github_user, self.operator.project
        )
    }
}

impl FromStr for ProvisionProfile {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut profile: ProvisionProfile =
            toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on all path fields.
        profile.options.ssh_key_path = expand_path(&profile.options.ssh_key_path)?;
        profile.options.clone_base_dir = expand_path(&profile.options.clone_base_dir)?;

        Ok(profile)
    }
}

impl Display for ProvisionProfile {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

fn expand_path(path: &PathBuf) -> Result<PathBuf> {
    Ok(PathBuf::from(
        shellexpand::full(path.to_string_lossy().as_ref())
            .map_err(ConfigError::ShellExpansion)?
            .into_owned(),
    ))
}

/// Required operator inputs.
///
/// All three are mandatory. The GitHub username is needed because both the
/// project clone URL and the deploy key instructions derive from it.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OperatorInput {
    /// Email address stamped into the generated SSH key comment.
    pub email: String,

    /// Name of the project repository to clone.
    pub project: String,

    /// GitHub account that owns the project repository.
    pub github_user: String,
}

/// Behavioral choices for the provisioning plan.
///
/// These capture the points on which operators historically disagreed, so
/// none of them is hardcoded. Every field has a default and may be omitted
/// from the profile file.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvisionOptions {
    /// Write convenience aliases into shell startup files.
    pub setup_aliases: bool,

    /// Wait for a keypress between provisioning steps.
    pub pause_between_steps: bool,

    /// Version argument handed to `nvm install`.
    pub node_version: String,

    /// Directory the project repository gets cloned under.
    pub clone_base_dir: PathBuf,

    /// Location of the SSH keypair to generate.
    pub ssh_key_path: PathBuf,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            setup_aliases: true,
            pause_between_steps: false,
            node_version: "--lts".into(),
            clone_base_dir: PathBuf::from("/srv"),
            ssh_key_path: path::default_ssh_key_path(),
        }
    }
}

/// Configuration error types.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),

    /// A required operator input is missing or empty.
    #[error("missing required operator input '{0}', see 'hostprep --help'")]
    MissingInput(&'static str),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use simple_test_case::test_case;

    #[sealed_test(env = [("KEYS", "/home/blah/.ssh")])]
    fn deserialize_provision_profile() -> anyhow::Result<()> {
        let result: ProvisionProfile = r#"
            [operator]
            email = "blah@blah.org"
            project = "widget-api"
            github_user = "blah"

            [options]
            setup_aliases = false
            pause_between_steps = true
            node_version = "20"
            clone_base_dir = "/srv"
            ssh_key_path = "$KEYS/id_ed25519"
        "#
        .parse()?;

        let expect = ProvisionProfile {
            operator: OperatorInput {
                email: "blah@blah.org".into(),
                project: "widget-api".into(),
                github_user: "blah".into(),
            },
            options: ProvisionOptions {
                setup_aliases: false,
                pause_between_steps: true,
                node_version: "20".into(),
                clone_base_dir: PathBuf::from("/srv"),
                ssh_key_path: PathBuf::from("/home/blah/.ssh/id_ed25519"),
            },
        };

        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn serialize_provision_profile() {
        let result = ProvisionProfile {
            operator: OperatorInput {
                email: "blah@blah.org".into(),
                project: "widget-api".into(),
                github_user: "blah".into(),
            },
            options: ProvisionOptions {
                setup_aliases: true,
                pause_between_steps: false,
                node_version: "--lts".into(),
                clone_base_dir: PathBuf::from("/srv"),
                ssh_key_path: PathBuf::from("/home/blah/.ssh/id_ed25519"),
            },
        }
        .to_string();

        let expect = indoc! {r#"
            [operator]
            email = "blah@blah.org"
            project = "widget-api"
            github_user = "blah"

            [options]
            setup_aliases = true
            pause_between_steps = false
            node_version = "--lts"
            clone_base_dir = "/srv"
            ssh_key_path = "/home/blah/.ssh/id_ed25519"
        "#};

        assert_eq!(result, expect);
    }

    #[test]
    fn partial_profile_falls_back_to_defaults() -> anyhow::Result<()> {
        let result: ProvisionProfile = r#"
            [operator]
            email = "blah@blah.org"
            project = "widget-api"
            github_user = "blah"
        "#
        .parse()?;

        assert_eq!(result.options.setup_aliases, true);
        assert_eq!(result.options.node_version, "--lts");
        assert_eq!(result.options.clone_base_dir, PathBuf::from("/srv"));

        Ok(())
    }

    #[test_case("", "widget-api", "blah", "email"; "empty email")]
    #[test_case("blah@blah.org", "", "blah", "project"; "empty project")]
    #[test_case("blah@blah.org", "widget-api", "  ", "github_user"; "blank github user")]
    #[test]
    fn validate_rejects_missing_inputs(email: &str, project: &str, github_user: &str, field: &str) {
        let profile = ProvisionProfile {
            operator: OperatorInput {
                email: email.into(),
                project: project.into(),
                github_user: github_user.into(),
            },
            ..Default::default()
        };

        match profile.validate() {
            Err(ConfigError::MissingInput(name)) => self::assert_eq!(name, field),
            other => panic!("expected MissingInput, got {other:?}"),
        }
    }

    #[test]
    fn derived_repository_paths() {
        let profile = ProvisionProfile {
            operator: OperatorInput {
                email: "blah@blah.org".into(),
                project: "widget-api".into(),
                github_user: "blah".into(),
            },
            ..Default::default()
        };

        assert_eq!(profile.repo_url(), "git@github.com:blah/widget-api.git");
        assert_eq!(profile.clone_dest(), PathBuf::from("/srv/widget-api"));
        assert_eq!(
            profile.deploy_key_url(),
            "https://github.com/blah/widget-api/settings/keys"
        );
    }
}
