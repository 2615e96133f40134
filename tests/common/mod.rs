use anyhow::Result;
use serde_json::Value;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use leakcheck::Config;

pub struct TestEnvironment {
    _temp_dir: TempDir, // Prefixed with _ to indicate it's kept for Drop cleanup
    pub reference_dir: PathBuf,
    pub input_dir: PathBuf,
    pub cleaned_dir: PathBuf,
    pub output_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let reference_dir = temp_dir.path().join("reference");
        let input_dir = temp_dir.path().join("inputs");
        let cleaned_dir = temp_dir.path().join("cleaned");
        let output_path = temp_dir.path().join("contamination_results.json");

        fs::create_dir_all(&reference_dir)?;
        fs::create_dir_all(&input_dir)?;
        fs::create_dir_all(&cleaned_dir)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            reference_dir,
            input_dir,
            cleaned_dir,
            output_path,
        })
    }
}

/// Write a JSONL file from raw lines, one per line.
pub fn write_jsonl(dir: &Path, name: &str, lines: &[&str]) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut file = File::create(&path)?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    Ok(path)
}

/// A config pointing at the test environment with test-friendly defaults.
pub fn base_config(env: &TestEnvironment, reference: PathBuf, inputs: Vec<PathBuf>) -> Config {
    Config {
        reference_jsonl: Some(reference),
        input_files: inputs,
        output: env.output_path.clone(),
        num_workers: 2,
        ..Config::default()
    }
}

pub fn read_report(path: &Path) -> Result<Vec<Value>> {
    let contents = fs::read_to_string(path)?;
    let report: Vec<Value> = serde_json::from_str(&contents)?;
    Ok(report)
}

/// Order-insensitive view of a report: (type, score in millis, input
/// question, reference question), sorted. Arrival order is not guaranteed
/// across tasks, so comparisons go through this.
#[allow(dead_code)]
pub fn match_summary(report: &[Value]) -> Vec<(String, u64, String, String)> {
    let mut summary: Vec<(String, u64, String, String)> = report
        .iter()
        .map(|m| {
            (
                m["type"].as_str().unwrap_or("").to_string(),
                (m["score"].as_f64().unwrap_or(-1.0) * 1000.0).round() as u64,
                m["input_entry"]["question"].as_str().unwrap_or("").to_string(),
                m["reference_entry"]["question"].as_str().unwrap_or("").to_string(),
            )
        })
        .collect();
    summary.sort();
    summary
}
