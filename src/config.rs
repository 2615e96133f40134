use std::path::PathBuf;

use anyhow::{bail, Error, Result};
use mj_io::read_pathbuf_to_mem;
use serde::{Deserialize, Serialize};

/// Run configuration, constructed once at start-up and passed by reference
/// into every stage. There is no global mutable state; every default lives
/// here as a serde default so that YAML config files and CLI flags layer the
/// same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Reference dataset selection: a local JSONL file, or a named catalog
    // entry resolved beneath catalog_dir as <catalog_dir>/<name>/<split>.jsonl
    #[serde(default)]
    pub reference_jsonl: Option<PathBuf>,
    #[serde(default)]
    pub reference_catalog: Option<String>,
    #[serde(default = "default_catalog_split")]
    pub catalog_split: String,
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: PathBuf,

    // Key names for question/answer in reference dataset entries
    #[serde(default = "default_question_key")]
    pub question_key: String,
    #[serde(default = "default_answer_key")]
    pub answer_key: String,

    // Input JSONL files to check for contamination
    #[serde(default)]
    pub input_files: Vec<PathBuf>,

    // Matching options
    #[serde(default = "default_jaccard_threshold")]
    pub jaccard_threshold: f64,
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,

    // Output options
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub purify: bool,
    #[serde(default)]
    pub cleaned_output_dir: Option<PathBuf>,
}

fn default_catalog_split() -> String {
    "train".to_string()
}

fn default_catalog_dir() -> PathBuf {
    PathBuf::from("reference")
}

fn default_question_key() -> String {
    "question".to_string()
}

fn default_answer_key() -> String {
    "answer".to_string()
}

fn default_jaccard_threshold() -> f64 {
    0.8
}

fn default_num_workers() -> usize {
    16
}

fn default_output() -> PathBuf {
    PathBuf::from("contamination_results.json")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reference_jsonl: None,
            reference_catalog: None,
            catalog_split: default_catalog_split(),
            catalog_dir: default_catalog_dir(),
            question_key: default_question_key(),
            answer_key: default_answer_key(),
            input_files: Vec::new(),
            jaccard_threshold: default_jaccard_threshold(),
            num_workers: default_num_workers(),
            output: default_output(),
            purify: false,
            cleaned_output_dir: None,
        }
    }
}

impl Config {
    /// Reject incomplete or contradictory configuration before any
    /// processing starts.
    pub fn validate(&self) -> Result<()> {
        match (&self.reference_jsonl, &self.reference_catalog) {
            (None, None) => {
                bail!("a reference dataset is required: set reference_jsonl or reference_catalog")
            }
            (Some(_), Some(_)) => {
                bail!("reference_jsonl and reference_catalog are mutually exclusive")
            }
            _ => {}
        }

        if self.input_files.is_empty() {
            bail!("at least one input JSONL file is required");
        }
        if !(0.0..=1.0).contains(&self.jaccard_threshold) {
            bail!(
                "jaccard_threshold must be in [0, 1], got {}",
                self.jaccard_threshold
            );
        }
        if self.num_workers == 0 {
            bail!("num_workers must be at least 1");
        }

        Ok(())
    }
}

pub fn read_config(config_path: &PathBuf) -> Result<Config, Error> {
    let contents = read_pathbuf_to_mem(config_path)?;
    let config: Config = serde_yaml::from_reader(contents)?;
    Ok(config)
}
