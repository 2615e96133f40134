use std::collections::HashSet;

/// Normalize a text string into a set of word tokens.
///
/// Lowercases, drops every character that is not a letter, digit, underscore
/// or whitespace, then splits on whitespace runs. Characters are dropped
/// rather than replaced, so "2+2" tokenizes to {"22"}.
pub fn tokenize(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned.split_whitespace().map(|w| w.to_string()).collect()
}

/// Jaccard similarity between two token sets, in [0, 1].
///
/// Two empty sets are defined to be identical (1.0) so that a pair of empty
/// text fields compares as a perfect overlap rather than a vacuous miss.
pub fn jaccard(set1: &HashSet<String>, set2: &HashSet<String>) -> f64 {
    if set1.is_empty() && set2.is_empty() {
        return 1.0;
    }

    let intersection = set1.intersection(set2).count();
    let union = set1.len() + set2.len() - intersection;

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_tokenize_strips_punctuation_and_case() {
        assert_eq!(
            tokenize("What is 2+2?"),
            set(&["what", "is", "22"])
        );
        assert_eq!(
            tokenize("Janet's ducks lay 16 eggs per day."),
            set(&["janets", "ducks", "lay", "16", "eggs", "per", "day"])
        );
    }

    #[test]
    fn test_tokenize_collapses_duplicates_and_whitespace() {
        assert_eq!(tokenize("the  the\tthe\nthe"), set(&["the"]));
        assert_eq!(tokenize("snake_case stays"), set(&["snake_case", "stays"]));
    }

    #[test]
    fn test_tokenize_empty_and_punctuation_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("?!...  ,,").is_empty());
    }

    #[test]
    fn test_jaccard_self_similarity_is_one() {
        for s in ["", "hello world", "What is 2+2?", "a a a b"] {
            let tokens = tokenize(s);
            assert_eq!(jaccard(&tokens, &tokens), 1.0, "failed for {:?}", s);
        }
    }

    #[test]
    fn test_jaccard_is_symmetric() {
        let a = set(&["a", "b", "c", "d"]);
        let b = set(&["a", "b", "c", "e"]);
        assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
        assert_eq!(jaccard(&a, &b), 0.6);
    }

    #[test]
    fn test_jaccard_empty_set_rules() {
        let empty = HashSet::new();
        assert_eq!(jaccard(&empty, &empty), 1.0);
        assert_eq!(jaccard(&empty, &set(&["x"])), 0.0);
        assert_eq!(jaccard(&set(&["x"]), &empty), 0.0);
    }

    #[test]
    fn test_jaccard_disjoint_and_partial() {
        assert_eq!(jaccard(&set(&["a", "b"]), &set(&["c", "d"])), 0.0);
        assert_eq!(jaccard(&set(&["a", "b"]), &set(&["b", "c"])), 1.0 / 3.0);
    }
}
