use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::text::{jaccard, tokenize};

/// One entry of the trusted reference dataset.
///
/// The full JSON record is kept verbatim for the report; the question and
/// answer fields are extracted once at load time (via the configured keys),
/// trimmed, and pre-tokenized so that matching a candidate against the
/// collection never re-derives reference token sets.
#[derive(Debug, Clone)]
pub struct ReferenceEntry {
    pub record: Value,
    pub question: String,
    pub answer: String,
    question_tokens: HashSet<String>,
    answer_tokens: HashSet<String>,
}

impl ReferenceEntry {
    /// Build an entry from a raw record. Returns `None` when either key is
    /// absent or holds a non-string value.
    pub fn from_record(record: Value, q_key: &str, a_key: &str) -> Option<Self> {
        let question = record.get(q_key)?.as_str()?.trim().to_string();
        let answer = record.get(a_key)?.as_str()?.trim().to_string();
        let question_tokens = tokenize(&question);
        let answer_tokens = tokenize(&answer);

        Some(ReferenceEntry {
            record,
            question,
            answer,
            question_tokens,
            answer_tokens,
        })
    }
}

/// Why a candidate entry was flagged against a reference entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    ExactMatch,
    JaccardQuestion,
    JaccardAnswer,
}

/// One positive match: a (reference, candidate) pair with the rule that
/// fired and its score. Serializes to the report's wire format.
#[derive(Debug, Clone, Serialize)]
pub struct ContaminationMatch {
    pub reference_entry: Value,
    pub input_entry: Value,
    #[serde(rename = "type")]
    pub kind: MatchKind,
    pub score: f64,
}

/// Check one raw candidate line against the full reference collection.
///
/// The candidate's `question` and `answer` fields are read by those literal
/// key names (missing or non-string values degrade to the empty string),
/// trimmed, and tokenized once. Each reference entry is then evaluated in
/// load order with a fixed precedence, short-circuiting at the first rule
/// that fires for that entry:
///
/// 1. exact trimmed-string equality on question or on answer (score 1.0)
/// 2. question token-set Jaccard at or above the threshold
/// 3. answer token-set Jaccard at or above the threshold
///
/// A candidate may therefore match several reference entries, but records
/// at most one match per reference entry.
///
/// A line that does not parse as JSON produces a diagnostic naming its
/// source and yields no matches; it never aborts the run.
pub fn check_candidate(
    line: &str,
    source: &Path,
    references: &[ReferenceEntry],
    threshold: f64,
) -> Vec<ContaminationMatch> {
    let input_entry: Value = match serde_json::from_str(line.trim()) {
        Ok(entry) => entry,
        Err(_) => {
            eprintln!("Invalid JSON in {}: {}", source.display(), line);
            return Vec::new();
        }
    };

    let input_q = input_entry
        .get("question")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();
    let input_a = input_entry
        .get("answer")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();
    let input_q_tokens = tokenize(&input_q);
    let input_a_tokens = tokenize(&input_a);

    let mut contaminated = Vec::new();

    for reference in references {
        // Exact match for question or answer
        if input_q == reference.question || input_a == reference.answer {
            contaminated.push(ContaminationMatch {
                reference_entry: reference.record.clone(),
                input_entry: input_entry.clone(),
                kind: MatchKind::ExactMatch,
                score: 1.0,
            });
            continue;
        }

        // Jaccard for question
        let q_sim = jaccard(&reference.question_tokens, &input_q_tokens);
        if q_sim >= threshold {
            contaminated.push(ContaminationMatch {
                reference_entry: reference.record.clone(),
                input_entry: input_entry.clone(),
                kind: MatchKind::JaccardQuestion,
                score: q_sim,
            });
            continue;
        }

        // Jaccard for answer
        let a_sim = jaccard(&reference.answer_tokens, &input_a_tokens);
        if a_sim >= threshold {
            contaminated.push(ContaminationMatch {
                reference_entry: reference.record.clone(),
                input_entry: input_entry.clone(),
                kind: MatchKind::JaccardAnswer,
                score: a_sim,
            });
        }
    }

    contaminated
}
