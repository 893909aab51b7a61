// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use hostprep::{provisioning_plan, InquirePrompt, ProvisionProfile, Sequencer, SystemHost};

use anyhow::Result;
use clap::Parser;
use std::{fs, path::PathBuf, process::exit};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "\n  hostprep [options] -e <email> -p <project> -g <github_user>",
    version
)]
struct Cli {
    /// Operator email, stamped into the generated SSH key.
    #[arg(short, long, value_name = "address")]
    pub email: Option<String>,

    /// Name of the project repository to clone.
    #[arg(short, long, value_name = "name")]
    pub project: Option<String>,

    /// GitHub account that owns the project repository.
    #[arg(short, long, value_name = "username")]
    pub github_user: Option<String>,

    /// Profile file supplying defaults for inputs and options.
    #[arg(short = 'f', long, value_name = "path")]
    pub profile: Option<PathBuf>,

    /// Skip the confirmation gate for unattended runs.
    #[arg(short = 'y', long)]
    pub assume_yes: bool,
}

impl Cli {
    fn run(self) -> Result<()> {
        let mut profile = match &self.profile {
            Some(file) => fs::read_to_string(file)?.parse::<ProvisionProfile>()?,
            None => ProvisionProfile::default(),
        };

        // INVARIANT: Command-line inputs override the profile file.
        if let Some(email) = self.email {
            profile.operator.email = email;
        }
        if let Some(project) = self.project {
            profile.operator.project = project;
        }
        if let Some(github_user) = self.github_user {
            profile.operator.github_user = github_user;
        }
        profile.validate()?;

        let sequencer = Sequencer::new(provisioning_plan())
            .with_pauses(profile.options.pause_between_steps)
            .assume_yes(self.assume_yes);
        let mut host = SystemHost::new();
        let mut prompt = InquirePrompt;

        let report = sequencer.run(&mut host, &mut prompt, &profile)?;
        for (step, error) in &report.warnings {
            warn!("step {step} did not complete: {error}");
        }
        info!(
            "provisioning finished, {} of {} steps completed",
            report.completed.len(),
            sequencer.steps().len()
        );

        Ok(())
    }
}

fn main() {
    let layer = fmt::layer().compact();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry().with(layer).with(filter).init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}
