//! End-to-end tests driving the compiled binary against a stub terraform.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Write a stub terraform that logs `$PWD|$*` per invocation, optionally
/// failing one subcommand, and answering `output` with fixed JSON.
fn write_stub_terraform(dir: &Path, log: &Path, fail_on: Option<&str>) -> PathBuf {
    let fail_clause = match fail_on {
        Some(subcommand) => format!(
            "if [ \"$1\" = \"{subcommand}\" ]; then echo boom >&2; exit 1; fi\n"
        ),
        None => String::new(),
    };
    let script = format!(
        "#!/bin/sh\n\
         echo \"$PWD|$*\" >> \"{log}\"\n\
         {fail_clause}\
         if [ \"$1\" = \"output\" ]; then\n\
           echo '{{\"bucket_name\":{{\"value\":\"demo-bucket\"}}}}'\n\
         fi\n\
         exit 0\n",
        log = log.display(),
    );
    let path = dir.join("terraform");
    fs::write(&path, script).expect("write stub terraform");
    let mut perms = fs::metadata(&path).expect("stat stub").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod stub");
    path
}

fn write_template(root: &Path) -> PathBuf {
    let template_dir = root.join("template");
    fs::create_dir(&template_dir).expect("create template dir");
    fs::write(template_dir.join("main.tf"), b"resource \"aws_s3_bucket\" \"b\" {}\n")
        .expect("write main.tf");
    fs::write(template_dir.join("variables.tf"), b"variable \"bucket_name\" {}\n")
        .expect("write variables.tf");
    template_dir
}

fn deploy_command(root: &Path, stub: &Path, name: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tfdeploy"));
    cmd.arg("deploy")
        .arg("--name")
        .arg(name)
        .arg("--template-dir")
        .arg(root.join("template"))
        .arg("--runs-dir")
        .arg(root.join("runs"))
        .arg("--terraform")
        .arg(stub);
    cmd
}

fn log_lines(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn deploy_runs_the_three_steps_in_the_run_directory() {
    let root = tempfile::tempdir().expect("tempdir");
    write_template(root.path());
    let log = root.path().join("calls.log");
    let stub = write_stub_terraform(root.path(), &log, None);

    let output = deploy_command(root.path(), &stub, "demo-bucket")
        .output()
        .expect("run tfdeploy");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let run_dir = root.path().join("runs").join("demo-bucket");
    assert_eq!(
        fs::read(run_dir.join("main.tf")).expect("read copied main.tf"),
        b"resource \"aws_s3_bucket\" \"b\" {}\n"
    );
    assert_eq!(
        fs::read_to_string(run_dir.join("terraform.tfvars")).expect("read tfvars"),
        "bucket_name = \"demo-bucket\"\nregion = \"us-east-1\"\n"
    );

    let lines = log_lines(&log);
    assert_eq!(lines.len(), 3, "log: {lines:?}");
    let expected_run_dir = run_dir.canonicalize().expect("canonicalize run dir");
    let expected_args = [
        "init -input=false",
        "apply -auto-approve -input=false -var-file=terraform.tfvars",
        "output -json",
    ];
    for (line, expected) in lines.iter().zip(expected_args) {
        let (pwd, args) = line.split_once('|').expect("pwd|args line");
        assert_eq!(Path::new(pwd), expected_run_dir);
        assert_eq!(args, expected);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"bucket_name\""), "stdout: {stdout}");
    assert!(stdout.contains("Deployment complete"), "stdout: {stdout}");
}

#[test]
fn failed_init_skips_apply_and_output() {
    let root = tempfile::tempdir().expect("tempdir");
    write_template(root.path());
    let log = root.path().join("calls.log");
    let stub = write_stub_terraform(root.path(), &log, Some("init"));

    let output = deploy_command(root.path(), &stub, "demo-bucket")
        .output()
        .expect("run tfdeploy");
    assert!(!output.status.success());

    let lines = log_lines(&log);
    assert_eq!(lines.len(), 1, "log: {lines:?}");
    assert!(lines[0].ends_with("init -input=false"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("init step failed"), "stderr: {stderr}");

    // No cleanup on failure: the prepared run directory stays behind.
    let run_dir = root.path().join("runs").join("demo-bucket");
    assert!(run_dir.join("terraform.tfvars").is_file());
}

#[test]
fn region_flag_reaches_the_var_file() {
    let root = tempfile::tempdir().expect("tempdir");
    write_template(root.path());
    let log = root.path().join("calls.log");
    let stub = write_stub_terraform(root.path(), &log, None);

    let status = deploy_command(root.path(), &stub, "demo-eu")
        .arg("--region")
        .arg("eu-west-1")
        .status()
        .expect("run tfdeploy");
    assert!(status.success());

    let tfvars = root
        .path()
        .join("runs")
        .join("demo-eu")
        .join("terraform.tfvars");
    let content = fs::read_to_string(tfvars).expect("read tfvars");
    assert!(content.contains("region = \"eu-west-1\""), "tfvars: {content}");
}

#[test]
fn missing_tool_fails_before_creating_the_run_directory() {
    let root = tempfile::tempdir().expect("tempdir");
    write_template(root.path());
    let missing = root.path().join("no-such-terraform");

    let output = deploy_command(root.path(), &missing, "demo-bucket")
        .output()
        .expect("run tfdeploy");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "stderr: {stderr}");
    assert!(!root.path().join("runs").exists());
}

#[test]
fn runs_command_lists_run_directories() {
    let root = tempfile::tempdir().expect("tempdir");
    let runs_dir = root.path().join("runs");
    fs::create_dir_all(runs_dir.join("demo-1")).expect("create run dir");
    fs::create_dir_all(runs_dir.join("demo-2")).expect("create run dir");

    let output = Command::new(env!("CARGO_BIN_EXE_tfdeploy"))
        .arg("runs")
        .arg("--runs-dir")
        .arg(&runs_dir)
        .arg("--json")
        .output()
        .expect("run tfdeploy");
    assert!(output.status.success());

    let listed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("parse runs JSON");
    let names: Vec<&str> = listed
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|entry| entry["name"].as_str())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"demo-1") && names.contains(&"demo-2"));
}
