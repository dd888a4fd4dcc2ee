//! Typed failures for the deploy pipeline.
//!
//! Each variant names the thing that failed; step failures carry the step
//! identity and captured output so the final report points at the exact
//! invocation that aborted the run.
use crate::terraform::Step;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deploy operations.
pub type DeployResult<T> = Result<T, DeployError>;

#[derive(Error, Debug)]
pub enum DeployError {
    /// Template directory unreadable
    #[error("read template directory {path}: {source}")]
    Template { path: PathBuf, source: io::Error },

    /// A template file could not be copied into the run directory
    #[error("copy template file {path}: {source}")]
    CopyFile { path: PathBuf, source: io::Error },

    /// Run directory could not be created
    #[error("create run directory {path}: {source}")]
    RunDir { path: PathBuf, source: io::Error },

    /// Variables file could not be written
    #[error("write variables file {path}: {source}")]
    VarFile { path: PathBuf, source: io::Error },

    /// The terraform invocation string did not parse as shell words
    #[error("parse terraform command {command:?}: {source}")]
    ToolCommand {
        command: String,
        source: shell_words::ParseError,
    },

    /// The terraform invocation string was empty
    #[error("terraform command is empty")]
    ToolCommandEmpty,

    /// The terraform program is not installed or not on PATH
    #[error("terraform program '{program}' not found")]
    ToolMissing { program: String },

    /// The external process could not be started at all
    #[error("spawn '{program}' for {step} step: {source}")]
    Spawn {
        step: Step,
        program: String,
        source: io::Error,
    },

    /// The external tool exited non-zero; later steps were not run
    #[error("{step} step failed ({status})\n{output}")]
    StepFailed {
        step: Step,
        status: String,
        output: String,
    },
}
