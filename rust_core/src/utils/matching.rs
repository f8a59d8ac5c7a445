//! Approximate string scoring for entity names.
//!
//! Scores are dissimilarities in `[0, 1]`: 0 is an exact match after
//! normalization, 1 shares nothing. A query may also match a contiguous run
//! of words inside a longer name ("Wolff" against "Josh Wolff"), scored
//! slightly worse than a whole-name match of the same quality.

use strsim::normalized_levenshtein;

/// Weight applied to word-window similarity relative to whole-name similarity
const PARTIAL_MATCH_WEIGHT: f64 = 0.9;

/// Candidates scoring above this are not considered matches at all
pub const MAX_CANDIDATE_SCORE: f64 = 0.6;

/// Normalize a string for comparison
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Best similarity between the query and any run of candidate words with the
/// same word count as the query.
fn window_similarity(query_norm: &str, candidate_norm: &str) -> f64 {
    let query_words = query_norm.split_whitespace().count();
    let candidate_words: Vec<&str> = candidate_norm.split_whitespace().collect();

    if query_words == 0 || query_words >= candidate_words.len() {
        return 0.0;
    }

    candidate_words
        .windows(query_words)
        .map(|window| normalized_levenshtein(query_norm, &window.join(" ")))
        .fold(0.0, f64::max)
}

/// Dissimilarity between two already-normalized strings.
pub fn score_normalized(query_norm: &str, candidate_norm: &str) -> f64 {
    if query_norm.is_empty() || candidate_norm.is_empty() {
        return 1.0;
    }
    if query_norm == candidate_norm {
        return 0.0;
    }

    let whole = normalized_levenshtein(query_norm, candidate_norm);
    let partial = window_similarity(query_norm, candidate_norm) * PARTIAL_MATCH_WEIGHT;

    (1.0 - whole.max(partial)).clamp(0.0, 1.0)
}

/// Dissimilarity between a free-text query and a candidate name.
pub fn score(query: &str, candidate: &str) -> f64 {
    score_normalized(&normalize(query), &normalize(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Josh   WOLFF!"), "josh wolff");
        assert_eq!(normalize("D.C. United"), "dc united");
    }

    #[test]
    fn test_exact_is_zero() {
        assert_eq!(score("Josh Wolff", "josh wolff"), 0.0);
    }

    #[test]
    fn test_dropped_character_scores_low() {
        let s = score("Josh Wolf", "Josh Wolff");
        assert!(s > 0.0 && s < 0.15, "score was {}", s);
    }

    #[test]
    fn test_unrelated_scores_high() {
        assert!(score("Zzyzx Nonexistent", "Josh Wolff") > 0.6);
        assert!(score("Zzyzx Nonexistent", "Bruce Arena") > 0.6);
    }

    #[test]
    fn test_surname_only_matches_window() {
        let s = score("Wolff", "Josh Wolff");
        assert!((s - 0.1).abs() < 1e-9, "score was {}", s);
        assert!(score("Wolff", "Josh Wolff") < score("Wolff", "Bruce Arena"));
    }

    #[test]
    fn test_monotonic_with_edits() {
        let one = score("Bruce Arenq", "Bruce Arena");
        let two = score("Bruce Arqnq", "Bruce Arena");
        assert!(one < two);
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(score("", "Josh Wolff"), 1.0);
        assert_eq!(score("!!!", "Josh Wolff"), 1.0);
    }
}
