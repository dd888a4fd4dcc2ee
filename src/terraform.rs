//! Fixed terraform step sequence and tool resolution.
//!
//! The external tool is a black box: this module only knows the three
//! commands the deploy flow issues and how to locate the program that
//! answers them.
use crate::error::{DeployError, DeployResult};
use std::fmt;
use std::path::PathBuf;

/// Name of the generated variables file, consumed by the apply step.
pub const VAR_FILE_NAME: &str = "terraform.tfvars";

/// One of the three external-tool invocations, in lifecycle order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Init,
    Apply,
    Output,
}

impl Step {
    /// Lifecycle order; steps always run in this sequence, none skipped.
    pub const ALL: [Step; 3] = [Step::Init, Step::Apply, Step::Output];

    pub fn name(self) -> &'static str {
        match self {
            Step::Init => "init",
            Step::Apply => "apply",
            Step::Output => "output",
        }
    }

    /// Arguments after the program for this step. Every step is
    /// non-interactive; apply auto-approves and reads the generated
    /// variables file from the run directory.
    fn args(self) -> &'static [&'static str] {
        match self {
            Step::Init => &["init", "-input=false"],
            Step::Apply => &[
                "apply",
                "-auto-approve",
                "-input=false",
                "-var-file=terraform.tfvars",
            ],
            Step::Output => &["output", "-json"],
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// External tool invocation parsed from a shell-words string, so a wrapper
/// command (`nix run nixpkgs#terraform --`) works as well as a bare program.
#[derive(Debug)]
pub struct Tool {
    pub program: String,
    base_args: Vec<String>,
}

impl Tool {
    pub fn parse(command: &str) -> DeployResult<Tool> {
        let mut words =
            shell_words::split(command).map_err(|source| DeployError::ToolCommand {
                command: command.to_string(),
                source,
            })?;
        if words.is_empty() {
            return Err(DeployError::ToolCommandEmpty);
        }
        let program = words.remove(0);
        Ok(Tool {
            program,
            base_args: words,
        })
    }

    /// Locate the program before any run-directory side effects happen.
    pub fn resolve(&self) -> DeployResult<PathBuf> {
        which::which(&self.program).map_err(|_| DeployError::ToolMissing {
            program: self.program.clone(),
        })
    }

    /// Full argv (after the program) for one step.
    pub fn argv(&self, step: Step) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.extend(step.args().iter().map(|arg| (*arg).to_string()));
        args
    }
}
