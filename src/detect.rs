// Parallel contamination detection.
//
// The reference collection is loaded once and shared read-only with a
// fixed-size worker pool. Candidate entries stream through the pool one at
// a time; each task's matches come back on a channel that the aggregator
// drains until every task is accounted for. Result order across tasks is
// arrival order, not submission order.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::{Error, Result};
use mj_io::build_pbar;
use rayon::iter::{ParallelBridge, ParallelIterator};

use crate::candidates::{count_candidate_lines, CandidateStream};
use crate::config::Config;
use crate::matcher::{check_candidate, ContaminationMatch, ReferenceEntry};
use crate::reference::load_reference;
use crate::report::{write_purified_file, write_report};

/// Run a full contamination check: load the reference collection, stream
/// every candidate entry through the worker pool, write the report, and
/// optionally write purified copies of the inputs.
pub fn execute_detect(config: &Config) -> Result<(), Error> {
    config.validate()?;
    let start = Instant::now();

    let references = load_reference(config)?;

    println!("Checking {} input files.", config.input_files.len());
    let total_entries = count_candidate_lines(&config.input_files)?;
    println!("Total input entries to process: {}", total_entries);

    let (report, contaminated_lines) = run_matching(config, &references, total_entries)?;

    write_report(&config.output, &report)?;

    if config.purify {
        purify_inputs(config, &contaminated_lines)?;
    }

    println!(
        "Found {} contaminated entries. Results saved to {}",
        report.len(),
        config.output.display()
    );
    println!("Total time: {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}

/// Fan candidate entries out across the worker pool and collect matches in
/// arrival order.
///
/// Also returns, per input file, the raw line numbers that produced at least
/// one match, for purification.
fn run_matching(
    config: &Config,
    references: &[ReferenceEntry],
    total_entries: usize,
) -> Result<(Vec<ContaminationMatch>, HashMap<PathBuf, HashSet<usize>>), Error> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_workers)
        .build()?;
    let stream = CandidateStream::new(config.input_files.clone());
    let threshold = config.jaccard_threshold;
    let pbar = build_pbar(total_entries, "Candidate entries");

    let (tx, rx) = mpsc::channel();

    let mut report = Vec::new();
    let mut contaminated_lines: HashMap<PathBuf, HashSet<usize>> = HashMap::new();

    thread::scope(|scope| {
        scope.spawn(move || {
            pool.install(|| {
                stream.par_bridge().for_each_with(tx, |tx, task| {
                    let matches =
                        check_candidate(&task.line, &task.source, references, threshold);
                    // The receiver only disappears if the aggregator died;
                    // nothing useful to do with the send error here.
                    let _ = tx.send((task.source, task.line_no, matches));
                });
            });
        });

        // The channel closes once every worker clone of the sender is done,
        // so draining it accounts for exactly the submitted tasks.
        for (source, line_no, matches) in rx {
            if !matches.is_empty() {
                contaminated_lines
                    .entry(source.as_ref().clone())
                    .or_default()
                    .insert(line_no);
            }
            report.extend(matches);
            pbar.inc(1);
        }
    });
    pbar.finish_with_message("Matching complete");

    Ok((report, contaminated_lines))
}

/// Write a `.clean.jsonl` copy of each input file that had contaminated
/// lines, with those lines removed.
fn purify_inputs(
    config: &Config,
    contaminated_lines: &HashMap<PathBuf, HashSet<usize>>,
) -> Result<(), Error> {
    let default_dir = config
        .output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();
    let cleaned_dir = config.cleaned_output_dir.clone().unwrap_or(default_dir);

    for input_path in &config.input_files {
        let Some(lines) = contaminated_lines.get(input_path) else {
            continue;
        };
        if lines.is_empty() {
            continue;
        }
        write_purified_file(input_path, &cleaned_dir, lines)?;
    }

    Ok(())
}
