//! Per-deployment run directories.
//!
//! A run owns one directory under the runs root. Template files are copied
//! in one level deep (subdirectories are not part of the template contract)
//! and the variables file is rendered last, overwriting any previous one.
use crate::error::{DeployError, DeployResult};
use crate::terraform::VAR_FILE_NAME;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// One deployment attempt: a name and the directory it exclusively owns.
#[derive(Debug)]
pub struct Run {
    pub name: String,
    pub dir: PathBuf,
}

impl Run {
    /// Create (or silently reuse) the run directory for `name`.
    pub fn prepare(runs_dir: &Path, name: &str) -> DeployResult<Run> {
        let dir = runs_dir.join(name);
        fs::create_dir_all(&dir).map_err(|source| DeployError::RunDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Run {
            name: name.to_string(),
            dir,
        })
    }

    /// Copy every regular file from `template_dir` into the run directory.
    /// Returns the number of files copied.
    pub fn materialize_template(&self, template_dir: &Path) -> DeployResult<usize> {
        let entries = fs::read_dir(template_dir).map_err(|source| DeployError::Template {
            path: template_dir.to_path_buf(),
            source,
        })?;
        let mut copied = 0;
        for entry in entries {
            let entry = entry.map_err(|source| DeployError::Template {
                path: template_dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let dest = self.dir.join(entry.file_name());
            fs::copy(&path, &dest).map_err(|source| DeployError::CopyFile {
                path: path.clone(),
                source,
            })?;
            copied += 1;
        }
        Ok(copied)
    }

    /// Render and overwrite the variables file. Returns its path.
    pub fn write_var_file(&self, bucket_name: &str, region: &str) -> DeployResult<PathBuf> {
        let path = self.dir.join(VAR_FILE_NAME);
        fs::write(&path, render_tfvars(bucket_name, region)).map_err(|source| {
            DeployError::VarFile {
                path: path.clone(),
                source,
            }
        })?;
        Ok(path)
    }
}

/// Default run name, derived from the current epoch millis so consecutive
/// invocations never share a directory.
pub fn generate_run_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    format!("capstone-demo-{millis}")
}

/// Exactly two assignments in tfvars syntax.
pub fn render_tfvars(bucket_name: &str, region: &str) -> String {
    format!(
        "bucket_name = \"{}\"\nregion = \"{}\"\n",
        escape_quoted(bucket_name),
        escape_quoted(region)
    )
}

// A quote or backslash in the name would otherwise corrupt the file.
fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
