// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Operator prompt capability.
//!
//! The confirmation gate and the optional pauses between steps both block on
//! operator input. They sit behind a capability trait so the sequencer can
//! run under test with scripted answers instead of a terminal.

use inquire::{Confirm, Text};

/// Interactive questions posed to the operator.
pub trait OperatorPrompt {
    /// Show the plan summary and ask for a go/no-go answer.
    fn confirm(&mut self, summary: &str) -> Result<bool>;

    /// Block until the operator presses enter.
    fn pause(&mut self, message: &str) -> Result<()>;
}

/// Operator prompting through the terminal.
#[derive(Debug, Default)]
pub struct InquirePrompt;

impl OperatorPrompt for InquirePrompt {
    fn confirm(&mut self, summary: &str) -> Result<bool> {
        println!("{summary}");
        Ok(Confirm::new("Proceed with provisioning?")
            .with_default(false)
            .prompt()?)
    }

    fn pause(&mut self, message: &str) -> Result<()> {
        Text::new(message).with_default("").prompt()?;

        Ok(())
    }
}

/// Operator prompting error types.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Terminal interaction fails or gets interrupted.
    #[error(transparent)]
    Inquire(#[from] inquire::InquireError),
}

/// Friendly result alias :3
pub type Result<T, E = PromptError> = std::result::Result<T, E>;
