//! Process execution seam for the deploy pipeline.
//!
//! Production code shells out synchronously with the run directory as cwd;
//! tests inject a recording fake so the pipeline's ordering contract is
//! checkable without a live terraform.
use std::io;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

/// Captured result of one external invocation.
pub struct StepOutput {
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl StepOutput {
    pub fn status_label(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

pub trait ProcessRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<StepOutput>;
}

/// Runs the real program, blocking until it completes.
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<StepOutput> {
        let start = Instant::now();
        let output = Command::new(program).args(args).current_dir(cwd).output()?;
        let elapsed_ms = start.elapsed().as_millis();

        tracing::info!(
            elapsed_ms,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "external command complete"
        );

        Ok(StepOutput {
            code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Render an argv as a copy-pasteable shell line for the pre-execution echo.
pub fn format_command_line(program: &str, argv: &[String]) -> String {
    let mut parts = Vec::with_capacity(argv.len() + 1);
    parts.push(shell_quote(program));
    for arg in argv {
        parts.push(shell_quote(arg));
    }
    parts.join(" ")
}

fn shell_quote(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }
    let safe = arg.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | '/' | ':' | '@' | '+' | '=')
    });
    if safe {
        return arg.to_string();
    }
    let escaped = arg.replace('\'', "'\"'\"'");
    format!("'{escaped}'")
}
