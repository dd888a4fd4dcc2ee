//! CLI argument parsing for the deploy orchestrator.
//!
//! The CLI is intentionally thin: flags carry only the paths and names the
//! pipeline needs, with defaults matching the original demo layout.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default region written to the variables file.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "tfdeploy",
    version,
    about = "Provision a storage bucket by driving terraform through init/apply/output",
    after_help = "Examples:\n  tfdeploy deploy\n  tfdeploy deploy --name demo-bucket --region eu-west-1\n  tfdeploy deploy --terraform 'nix run nixpkgs#terraform --'\n  tfdeploy runs --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Deploy(DeployArgs),
    Runs(RunsArgs),
}

/// Deploy command inputs for a single run.
#[derive(Parser, Debug)]
#[command(about = "Run one deployment: copy template, write vars, drive terraform")]
pub struct DeployArgs {
    /// Bucket and run name; generated from the current time when omitted
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Region written to the variables file
    #[arg(long, value_name = "REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Directory holding the static terraform template files
    #[arg(long, value_name = "DIR", default_value = "backend/terraform")]
    pub template_dir: PathBuf,

    /// Directory receiving one subdirectory per run
    #[arg(long, value_name = "DIR", default_value = "backend/runs")]
    pub runs_dir: PathBuf,

    /// Terraform invocation; parsed as shell words, so a wrapper command works
    #[arg(long, value_name = "CMD", default_value = "terraform")]
    pub terraform: String,
}

/// Runs command inputs for listing previous run directories.
#[derive(Parser, Debug)]
#[command(about = "List previous run directories, newest first")]
pub struct RunsArgs {
    /// Directory receiving one subdirectory per run
    #[arg(long, value_name = "DIR", default_value = "backend/runs")]
    pub runs_dir: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}
