//! Drives one deployment run end to end.
//!
//! The pipeline is strictly linear: prepare the run directory, materialize
//! the template, write the variables file, then init, apply, and output in
//! fixed order. The first failure aborts; nothing is retried or cleaned up,
//! including external state a partial apply may have created.
use crate::error::{DeployError, DeployResult};
use crate::run::Run;
use crate::runner::{format_command_line, ProcessRunner};
use crate::terraform::{Step, Tool};
use std::path::{Path, PathBuf};

/// Explicit configuration for one deployment, injectable in tests.
pub struct DeployConfig {
    pub template_dir: PathBuf,
    pub runs_dir: PathBuf,
    pub region: String,
}

#[derive(Debug)]
pub struct DeployOutcome {
    pub run: Run,
    /// Raw text of the final `output -json` step.
    pub outputs_json: String,
}

pub fn deploy<R: ProcessRunner>(
    config: &DeployConfig,
    tool: &Tool,
    runner: &R,
    name: &str,
) -> DeployResult<DeployOutcome> {
    let run = Run::prepare(&config.runs_dir, name)?;
    let copied = run.materialize_template(&config.template_dir)?;
    let var_file = run.write_var_file(name, &config.region)?;
    tracing::info!(
        run = %run.name,
        copied,
        var_file = %var_file.display(),
        "run directory ready"
    );

    let mut outputs_json = String::new();
    for step in Step::ALL {
        outputs_json = run_step(tool, runner, step, &run.dir)?;
    }
    Ok(DeployOutcome { run, outputs_json })
}

/// Run one step synchronously in the run directory, echoing the command line
/// before and the captured output after. Returns the step's stdout.
fn run_step<R: ProcessRunner>(
    tool: &Tool,
    runner: &R,
    step: Step,
    cwd: &Path,
) -> DeployResult<String> {
    let argv = tool.argv(step);
    println!("$ {}", format_command_line(&tool.program, &argv));

    let output = runner
        .run(&tool.program, &argv, cwd)
        .map_err(|source| DeployError::Spawn {
            step,
            program: tool.program.clone(),
            source,
        })?;

    if !output.stdout.is_empty() {
        print!("{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        eprint!("{}", output.stderr);
    }

    if !output.success {
        let status = output.status_label();
        let mut combined = output.stdout;
        if !output.stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&output.stderr);
        }
        return Err(DeployError::StepFailed {
            step,
            status,
            output: combined.trim_end().to_string(),
        });
    }

    Ok(output.stdout)
}
