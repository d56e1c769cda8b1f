use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use landreg_core::Application;
use landreg_generate::{GenerationReport, TypeWeighting};

use super::{RegistryError, RegistryResult};

/// Generation inputs recorded with each run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOptions {
    pub seed: u64,
    pub today: NaiveDate,
    pub mode: String,
    pub weighting: TypeWeighting,
    pub max_reference_attempts: u32,
    /// Requested `(type name, count)` pairs; empty for random runs.
    pub type_counts: Vec<(String, usize)>,
    pub random_count: Option<usize>,
}

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub run_dir: PathBuf,
    pub catalog_version: String,
    pub catalog_source: String,
    pub options: RunOptions,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    pub tool_version: String,
    pub catalog_version: String,
    pub catalog_source: String,
    pub options: RunOptions,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub applications_path: PathBuf,
    pub report_path: PathBuf,
    pub logs_path: PathBuf,
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id));

    create_dir_all(&root)?;

    let config_path = root.join("run.json");
    let logs_path = root.join("logs.jsonl");

    let config = RunConfig {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at.to_rfc3339(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_version: ctx.catalog_version.clone(),
        catalog_source: ctx.catalog_source.clone(),
        options: ctx.options.clone(),
        git: collect_git_info(),
    };

    write_json(&config_path, &config)?;

    OpenOptions::new().create(true).append(true).open(&logs_path)?;

    Ok(RunPaths {
        applications_path: root.join("applications.json"),
        report_path: root.join("generation_report.json"),
        logs_path,
        root,
    })
}

pub fn write_applications(paths: &RunPaths, applications: &[Application]) -> RegistryResult<()> {
    write_json(&paths.applications_path, applications)
}

pub fn write_report(paths: &RunPaths, report: &GenerationReport) -> RegistryResult<()> {
    write_json(&paths.report_path, report)
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(run_dir: PathBuf) -> RunContext {
        RunContext {
            run_id: "7f3c".to_string(),
            started_at: DateTime::parse_from_rfc3339("2024-06-30T09:15:00Z")
                .expect("timestamp")
                .with_timezone(&Utc),
            run_dir,
            catalog_version: "0.1".to_string(),
            catalog_source: "embedded".to_string(),
            options: RunOptions {
                seed: 42,
                today: NaiveDate::from_ymd_opt(2024, 6, 30).expect("date"),
                mode: "random".to_string(),
                weighting: TypeWeighting::Uniform,
                max_reference_attempts: 32,
                type_counts: Vec::new(),
                random_count: Some(20),
            },
        }
    }

    #[test]
    fn start_run_lays_out_run_directory() {
        let run_dir = std::env::temp_dir().join(format!("landreg_runs_{}", uuid::Uuid::new_v4()));
        let paths = start_run(&context(run_dir.clone())).expect("start run");

        assert_eq!(paths.root, run_dir.join("2024-06-30T09-15-00Z__run_7f3c"));
        assert!(paths.logs_path.exists());

        let config: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(paths.root.join("run.json")).expect("read run.json"),
        )
        .expect("parse run.json");
        assert_eq!(config["options"]["seed"], 42);
        assert_eq!(config["options"]["today"], "2024-06-30");
        assert_eq!(config["options"]["weighting"]["mode"], "uniform");
        assert_eq!(config["catalog_version"], "0.1");

        std::fs::remove_dir_all(&run_dir).ok();
    }
}
