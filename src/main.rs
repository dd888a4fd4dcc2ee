use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod deploy;
mod error;
mod run;
mod runner;
mod runs;
mod terraform;

use cli::{Command, DeployArgs, RootArgs, RunsArgs};
use deploy::DeployConfig;
use runner::SystemRunner;
use terraform::Tool;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Deploy(args) => cmd_deploy(args),
        Command::Runs(args) => cmd_runs(args),
    }
}

fn cmd_deploy(args: DeployArgs) -> Result<()> {
    let tool = Tool::parse(&args.terraform)?;
    // Resolve the program up front so a missing tool fails with no side effects.
    let program = tool.resolve()?;
    tracing::debug!(program = %program.display(), "resolved terraform program");

    let name = args.name.unwrap_or_else(run::generate_run_name);
    let config = DeployConfig {
        template_dir: args.template_dir,
        runs_dir: args.runs_dir,
        region: args.region,
    };

    let outcome = deploy::deploy(&config, &tool, &SystemRunner, &name)
        .with_context(|| format!("deploy {name}"))?;
    println!("Terraform output: {}", outcome.outputs_json.trim_end());
    println!(
        "Deployment complete: {} ({})",
        outcome.run.name,
        outcome.run.dir.display()
    );
    Ok(())
}

fn cmd_runs(args: RunsArgs) -> Result<()> {
    let entries = runs::list_runs(&args.runs_dir)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No runs under {}", args.runs_dir.display());
        return Ok(());
    }
    for entry in &entries {
        println!("{}", entry.name);
    }
    Ok(())
}
