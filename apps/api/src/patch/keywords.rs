//! Keyword extraction for the local fallback strategy.
//!
//! Deterministic: lowercase, keep `[a-z0-9+.#-]`, drop stop words and tokens
//! shorter than 3 chars, rank by frequency with first-seen order breaking ties.

use std::collections::HashMap;

/// Maximum keywords returned by `pick_top_keywords`.
pub const MAX_KEYWORDS: usize = 8;

const STOP_WORDS: &[&str] = &[
    "the", "and", "with", "for", "you", "your", "our", "are", "will", "this", "that", "from",
    "into", "have", "has", "had", "a", "an", "to", "of", "in", "on", "at", "as", "by", "or", "is",
    "be", "we", "they", "it", "their", "than", "but", "experience", "years", "required",
    "preferred", "responsibilities", "requirements", "skills", "role", "team", "work", "using",
];

/// Splits guidance text into normalized candidate tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '.' | '#' | '-') {
                c
            } else {
                ' '
            }
        })
        .collect();

    normalized
        .split_whitespace()
        .filter(|t| t.chars().count() >= 3 && !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Returns up to `max` keywords ranked by descending frequency.
pub fn pick_top_keywords(text: &str, max: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for token in tokenize(text) {
        match index.get(&token) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(token.clone(), counts.len());
                counts.push((token, 1));
            }
        }
    }

    // sort_by is stable: equal counts keep first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(max).map(|(t, _)| t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_backend_scenario() {
        let kws = pick_top_keywords(
            "Looking for a Python backend engineer with SQL and AWS experience",
            MAX_KEYWORDS,
        );
        assert_eq!(
            kws,
            vec!["looking", "python", "backend", "engineer", "sql", "aws"]
        );
    }

    #[test]
    fn test_frequency_ranks_first() {
        let kws = pick_top_keywords("rust go rust kafka rust kafka", MAX_KEYWORDS);
        assert_eq!(kws, vec!["rust", "kafka"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let kws = pick_top_keywords("zeta alpha mid", MAX_KEYWORDS);
        assert_eq!(kws, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_symbols_preserved_in_tokens() {
        let tokens = tokenize("C++, C#, Node.js and front-end!");
        assert_eq!(tokens, vec!["c++", "node.js", "front-end"]);
    }

    #[test]
    fn test_stop_words_and_short_tokens_dropped() {
        let tokens = tokenize("The team will work on AI and ML using Go");
        assert!(tokens.is_empty(), "got {tokens:?}");
    }

    #[test]
    fn test_caps_at_max() {
        let text = "one1 two2 three3 four4 five5 six6 seven7 eight8 nine9 ten10";
        assert_eq!(pick_top_keywords(text, MAX_KEYWORDS).len(), 8);
        assert_eq!(pick_top_keywords(text, 3).len(), 3);
    }

    #[test]
    fn test_is_deterministic() {
        let text = "Kubernetes Terraform kubernetes AWS terraform GCP";
        assert_eq!(
            pick_top_keywords(text, MAX_KEYWORDS),
            pick_top_keywords(text, MAX_KEYWORDS)
        );
    }
}
