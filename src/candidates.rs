// Streaming candidate input.
//
// Candidate entries are never materialized as a whole: the stream reads one
// line at a time across all input files, in file-list order then line order.
// Only the reference collection is required to be fully resident.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Error, Result};
use flate2::read::GzDecoder;
use zstd::stream::read::Decoder as ZstdDecoder;

/// One unit of matching work: a raw candidate line plus its origin. The
/// source path is carried for diagnostics and purification only; it plays no
/// part in match logic. Line numbers are raw 0-based positions in the file,
/// blank lines included, so purification can address lines by position.
pub struct CandidateTask {
    pub line: String,
    pub source: Arc<PathBuf>,
    pub line_no: usize,
}

/// Open a candidate file for line-by-line reading, decoding .gz and .zst
/// transparently.
pub fn open_candidate_reader(path: &Path) -> Result<Box<dyn BufRead + Send>, Error> {
    let file = File::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open input file {}: {}", path.display(), e))?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("gz") => Ok(Box::new(BufReader::new(GzDecoder::new(file)))),
        Some("zst") => Ok(Box::new(BufReader::new(ZstdDecoder::new(file)?))),
        _ => Ok(Box::new(BufReader::new(file))),
    }
}

/// Count non-blank lines across all input files.
///
/// This sizes the progress bar and doubles as an up-front readability check:
/// an input that cannot be opened or read is fatal here, before any worker
/// starts.
pub fn count_candidate_lines(input_files: &[PathBuf]) -> Result<usize, Error> {
    let mut total = 0;
    for path in input_files {
        let reader = open_candidate_reader(path)?;
        for line in reader.lines() {
            let line = line
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            if !line.trim().is_empty() {
                total += 1;
            }
        }
    }
    Ok(total)
}

/// Lazy concatenation of all input files into one sequence of tasks.
/// Blank lines are skipped silently.
pub struct CandidateStream {
    pending: VecDeque<PathBuf>,
    current: Option<(Arc<PathBuf>, Box<dyn BufRead + Send>, usize)>,
}

impl CandidateStream {
    pub fn new(input_files: Vec<PathBuf>) -> Self {
        CandidateStream {
            pending: input_files.into(),
            current: None,
        }
    }
}

impl Iterator for CandidateStream {
    type Item = CandidateTask;

    fn next(&mut self) -> Option<CandidateTask> {
        loop {
            if let Some((source, reader, line_no)) = self.current.as_mut() {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => {
                        self.current = None;
                    }
                    Ok(_) => {
                        let this_line = *line_no;
                        *line_no += 1;
                        while line.ends_with('\n') || line.ends_with('\r') {
                            line.pop();
                        }
                        if line.trim().is_empty() {
                            continue;
                        }
                        return Some(CandidateTask {
                            line,
                            source: source.clone(),
                            line_no: this_line,
                        });
                    }
                    Err(e) => {
                        // The count pass already proved this file readable;
                        // a failure mid-stream ends this file only.
                        eprintln!("Error reading {}: {}", source.display(), e);
                        self.current = None;
                    }
                }
            } else {
                let path = self.pending.pop_front()?;
                match open_candidate_reader(&path) {
                    Ok(reader) => {
                        self.current = Some((Arc::new(path), reader, 0));
                    }
                    Err(e) => {
                        eprintln!("{}", e);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_stream_concatenates_files_and_skips_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.jsonl", "{\"q\":1}\n\n{\"q\":2}\n");
        let b = write_file(dir.path(), "b.jsonl", "   \n{\"q\":3}\n");

        let tasks: Vec<CandidateTask> = CandidateStream::new(vec![a.clone(), b.clone()]).collect();

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].line, "{\"q\":1}");
        assert_eq!(tasks[0].line_no, 0);
        assert_eq!(*tasks[0].source, a);
        // Blank line at index 1 is skipped but still counted in numbering
        assert_eq!(tasks[1].line_no, 2);
        assert_eq!(tasks[2].line, "{\"q\":3}");
        assert_eq!(tasks[2].line_no, 1);
        assert_eq!(*tasks[2].source, b);
    }

    #[test]
    fn test_count_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.jsonl", "{\"q\":1}\n\n{\"q\":2}\n\n\n");
        assert_eq!(count_candidate_lines(&[a]).unwrap(), 2);
    }

    #[test]
    fn test_count_fails_on_missing_file() {
        let missing = PathBuf::from("/nonexistent/nope.jsonl");
        assert!(count_candidate_lines(&[missing]).is_err());
    }

    #[test]
    fn test_gzip_round_trip() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.jsonl.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"{\"q\":1}\n{\"q\":2}\n").unwrap();
        encoder.finish().unwrap();

        assert_eq!(count_candidate_lines(&[path.clone()]).unwrap(), 2);
        let tasks: Vec<CandidateTask> = CandidateStream::new(vec![path]).collect();
        assert_eq!(tasks.len(), 2);
    }
}
