// Reference dataset loading.
//
// The reference collection is built once per run, in load order, and shared
// read-only with every worker. Two sources are supported: a local JSONL file,
// or a named catalog entry (pre-downloaded datasets laid out on disk as
// <catalog_dir>/<name>/<split>.jsonl, optionally gzipped).

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Error, Result};
use mj_io::{build_pbar, read_pathbuf_to_mem};
use serde_json::Value;

use crate::config::Config;
use crate::matcher::ReferenceEntry;

/// Load the ordered reference collection named by the config.
///
/// Records missing either configured key (or holding non-string values
/// there) are skipped with a per-record diagnostic, as are lines that do not
/// parse as JSON. Duplicates are kept; order is load order.
pub fn load_reference(config: &Config) -> Result<Vec<ReferenceEntry>, Error> {
    let path = resolve_reference_path(config)?;
    let q_key = config.question_key.as_str();
    let a_key = config.answer_key.as_str();

    // Count lines up front so the progress bar has a total.
    let total_lines = read_pathbuf_to_mem(&path)?.lines().count();
    let pbar = build_pbar(total_lines, "Reference entries");

    let mut references = Vec::new();
    let data = read_pathbuf_to_mem(&path)?;
    for line in data.lines() {
        let line = line?;
        pbar.inc(1);

        if line.trim().is_empty() {
            continue;
        }

        let record: Value = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(_) => {
                eprintln!("Invalid JSON in reference {}: {}", path.display(), line);
                continue;
            }
        };

        match ReferenceEntry::from_record(record, q_key, a_key) {
            Some(entry) => references.push(entry),
            None => {
                eprintln!("Entry missing keys {} or {}: {}", q_key, a_key, line);
            }
        }
    }
    pbar.finish_with_message("Reference data loaded");

    println!("Loaded {} reference entries.", references.len());
    Ok(references)
}

/// Resolve the configured reference source to a concrete file path.
///
/// Config validation already guaranteed exactly one source is set. A missing
/// file is fatal here, before any candidate processing begins.
fn resolve_reference_path(config: &Config) -> Result<PathBuf, Error> {
    if let Some(path) = &config.reference_jsonl {
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Reference file not found at {}",
                path.display()
            ));
        }
        return Ok(path.clone());
    }

    let name = config
        .reference_catalog
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no reference source configured"))?;
    let entry_dir = config.catalog_dir.join(name);

    for filename in [
        format!("{}.jsonl", config.catalog_split),
        format!("{}.jsonl.gz", config.catalog_split),
    ] {
        let candidate = entry_dir.join(&filename);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(anyhow::anyhow!(
        "Catalog entry '{}' has no split '{}' under {}",
        name,
        config.catalog_split,
        config.catalog_dir.display()
    ))
}
