// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Provisioning sequencer.
//!
//! Runs a fixed, statically ordered plan of provisioning steps against the
//! host capability layer. Steps come in two tiers: __best-effort__ steps
//! whose failures are logged and skipped over, and __checked__ steps whose
//! failures abort the whole run with a diagnostic. Every step returns an
//! explicit [`Result`] that the sequencer inspects immediately after
//! invocation, so there is no ambient exit-status bookkeeping anywhere.
//!
//! Before the first step runs, the operator is shown the parsed inputs and
//! the full plan, and must confirm. Declining performs zero host mutations.

pub mod plan;

use crate::{
    config::ProvisionProfile,
    host::{Host, HostError},
    prompt::{OperatorPrompt, PromptError},
};

use std::fmt::Write;
use tracing::{info, warn};

/// Action a provisioning step performs against the host.
pub type StepFn = fn(&mut dyn Host, &ProvisionProfile) -> Result<(), HostError>;

/// Failure policy of a provisioning step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Criticality {
    /// Failure is logged as a warning and the sequence continues.
    #[default]
    BestEffort,

    /// Failure aborts the whole sequence immediately.
    Fatal,
}

/// One entry of the provisioning plan.
#[derive(Clone, Copy, Debug)]
pub struct StepSpec {
    /// Human-readable step identifier used in logs and diagnostics.
    pub name: &'static str,

    /// Failure policy for this step.
    pub criticality: Criticality,

    /// Side-effecting action to run.
    pub run: StepFn,
}

/// What a finished run accomplished.
#[derive(Debug, Default)]
pub struct SequenceReport {
    /// Names of steps that ran to completion.
    pub completed: Vec<&'static str>,

    /// Best-effort steps that failed, with their errors.
    pub warnings: Vec<(&'static str, HostError)>,
}

/// Runs the provisioning plan in order.
pub struct Sequencer {
    steps: Vec<StepSpec>,
    pause_between: bool,
    assume_yes: bool,
}

impl Sequencer {
    /// Construct new sequencer over a plan.
    pub fn new(steps: Vec<StepSpec>) -> Self {
        Self {
            steps,
            pause_between: false,
            assume_yes: false,
        }
    }

    /// Wait for a keypress between steps, so the operator can read output.
    pub fn with_pauses(mut self, pause_between: bool) -> Self {
        self.pause_between = pause_between;
        self
    }

    /// Skip the confirmation gate for unattended runs.
    pub fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    /// Steps of the plan, in execution order.
    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    /// Run the plan against a host.
    ///
    /// Gates on operator confirmation first, then executes every step in
    /// order. Best-effort failures are collected into the report; a checked
    /// failure aborts immediately.
    ///
    /// # Errors
    ///
    /// - Return [`SequenceError::Declined`] if the operator answers no.
    /// - Return [`SequenceError::Prompt`] if terminal interaction fails.
    /// - Return [`SequenceError::Checked`] if a fatal step fails.
    pub fn run(
        &self,
        host: &mut dyn Host,
        prompt: &mut dyn OperatorPrompt,
        profile: &ProvisionProfile,
    ) -> Result<SequenceReport, SequenceError> {
        // INVARIANT: No host mutation happens before the gate.
        if self.assume_yes {
            info!("confirmation gate skipped, --assume-yes given");
        } else if !prompt.confirm(self.summary(profile).as_str())? {
            return Err(SequenceError::Declined);
        }

        let mut report = SequenceReport::default();
        let total = self.steps.len();
        for (index, step) in self.steps.iter().enumerate() {
            if self.pause_between && index > 0 {
                prompt.pause("press enter for the next step")?;
            }

            info!("({}/{total}) {}", index + 1, step.name);
            match (step.run)(host, profile) {
                Ok(()) => report.completed.push(step.name),
                Err(error) if step.criticality == Criticality::Fatal => {
                    return Err(SequenceError::Checked {
                        step: step.name,
                        source: error,
                    });
                }
                Err(error) => {
                    warn!("step {} failed, continuing: {error}", step.name);
                    report.warnings.push((step.name, error));
                }
            }
        }

        Ok(report)
    }

    fn summary(&self, profile: &ProvisionProfile) -> String {
        let mut summary = String::new();
        let _ = writeln!(summary, "About to provision this host with:");
        let _ = writeln!(summary, "  email:       {}", profile.operator.email);
        let _ = writeln!(summary, "  project:     {}", profile.operator.project);
        let _ = writeln!(summary, "  github user: {}", profile.operator.github_user);
        let _ = writeln!(summary, "  repository:  {}", profile.repo_url());
        let _ = writeln!(summary, "Planned steps:");
        for step in &self.steps {
            let _ = writeln!(summary, "  - {}", step.name);
        }

        summary
    }
}

/// Sequencer error types.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// Operator answered no at the confirmation gate.
    #[error("operator declined the provisioning plan")]
    Declined,

    /// Terminal interaction fails.
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// A checked step failed.
    #[error("checked step '{step}' failed")]
    Checked {
        /// Name of the step that failed.
        step: &'static str,

        /// Underlying host error.
        #[source]
        source: HostError,
    },
}
