// Report and purified-file output.

use std::collections::HashSet;
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Error, Result};

use crate::candidates::open_candidate_reader;
use crate::matcher::ContaminationMatch;

/// Write the contamination report as a pretty-printed JSON array, one object
/// per match in arrival order. Non-ASCII text passes through unescaped.
pub fn write_report(output_path: &Path, matches: &[ContaminationMatch]) -> Result<(), Error> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let file = File::create(output_path).map_err(|e| {
        anyhow::anyhow!("Failed to create output file {}: {}", output_path.display(), e)
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, matches)?;
    writer.flush()?;

    Ok(())
}

pub fn get_purified_filename(input_file: &Path) -> String {
    let filename = input_file
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    // Remove .jsonl and any compression extension after it
    let base_name = if let Some(pos) = filename.find(".jsonl") {
        &filename[..pos]
    } else {
        input_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
    };

    format!("{}.clean.jsonl", base_name)
}

/// Write a copy of an input file with the given raw line numbers removed.
pub fn write_purified_file(
    input_path: &Path,
    cleaned_output_dir: &Path,
    contaminated_lines: &HashSet<usize>,
) -> Result<PathBuf, Error> {
    create_dir_all(cleaned_output_dir)?;

    let purified_filename = get_purified_filename(input_path);
    let purified_path = cleaned_output_dir.join(&purified_filename);

    let reader = open_candidate_reader(input_path)?;
    let mut output_file = BufWriter::new(File::create(&purified_path)?);

    let mut removed_count = 0;
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if contaminated_lines.contains(&line_num) {
            removed_count += 1;
        } else {
            writeln!(output_file, "{}", line)?;
        }
    }
    output_file.flush()?;

    println!(
        "Created purified file: {} (removed {} contaminated lines)",
        purified_path.display(),
        removed_count
    );

    Ok(purified_path)
}
