// External crates
use anyhow::{Error, Result};
use clap::Parser;

// Standard library
use std::path::PathBuf;

use leakcheck::{execute_detect, read_config, Config};

/*=================================================================
=                                  ARGS                           =
=================================================================*/

#[derive(Parser)]
#[clap(author, version, about = "Contamination check between a reference Q/A dataset and input JSONL datasets using exact match and Jaccard similarity.", long_about = None)]
struct ArgParser {
    #[arg(long, help = "Optional YAML config file; CLI flags override its values")]
    config: Option<PathBuf>,

    #[arg(long, help = "Path to reference JSONL file")]
    reference_jsonl: Option<PathBuf>,

    #[arg(long, help = "Named catalog entry to use as the reference dataset")]
    reference_catalog: Option<String>,

    #[arg(long, help = "Split to load from the catalog entry (default: train)")]
    catalog_split: Option<String>,

    #[arg(long, help = "Directory holding downloaded catalog datasets")]
    catalog_dir: Option<PathBuf>,

    #[arg(long, help = "Key for question/problem in reference dataset entries")]
    question_key: Option<String>,

    #[arg(long, help = "Key for answer/solution in reference dataset entries")]
    answer_key: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Comma-separated list of input JSONL files to check")]
    inputs: Vec<PathBuf>,

    #[arg(long, help = "Jaccard similarity threshold for contamination (default: 0.8)")]
    jaccard_threshold: Option<f64>,

    #[arg(long, help = "Number of worker threads to use (default: 16)")]
    workers: Option<usize>,

    #[arg(long, help = "Output file for contamination results")]
    output: Option<PathBuf>,

    #[arg(long, help = "Write purified copies of input files with contaminated lines removed")]
    purify: bool,

    #[arg(long, help = "Directory for purified output files")]
    cleaned_output_dir: Option<PathBuf>,
}

/*=================================================================
=                                  MAIN                           =
=================================================================*/

fn build_config(args: ArgParser) -> Result<Config, Error> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => Config::default(),
    };

    if let Some(reference_jsonl) = args.reference_jsonl {
        config.reference_jsonl = Some(reference_jsonl);
    }
    if let Some(reference_catalog) = args.reference_catalog {
        config.reference_catalog = Some(reference_catalog);
    }
    if let Some(catalog_split) = args.catalog_split {
        config.catalog_split = catalog_split;
    }
    if let Some(catalog_dir) = args.catalog_dir {
        config.catalog_dir = catalog_dir;
    }
    if let Some(question_key) = args.question_key {
        config.question_key = question_key;
    }
    if let Some(answer_key) = args.answer_key {
        config.answer_key = answer_key;
    }
    if !args.inputs.is_empty() {
        config.input_files = args.inputs;
    }
    if let Some(jaccard_threshold) = args.jaccard_threshold {
        config.jaccard_threshold = jaccard_threshold;
    }
    if let Some(workers) = args.workers {
        config.num_workers = workers;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if args.purify {
        config.purify = true;
    }
    if let Some(cleaned_output_dir) = args.cleaned_output_dir {
        config.cleaned_output_dir = Some(cleaned_output_dir);
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = ArgParser::parse();
    let config = build_config(args)?;
    execute_detect(&config)
}
