//! Fuzzy paragraph matching.
//!
//! Annotated snippets are short excerpts that rarely match the extracted
//! paragraphs byte for byte (markup, whitespace, and editing differences), so
//! candidates are ranked by how well the shorter string aligns against the
//! best substring of the longer one.

use std::fmt;

/// Scores strictly above this count as high-confidence matches.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphMatch<'a> {
    pub text: &'a str,
    pub score: f64,
}

/// Partial similarity on a 0-100 scale.
///
/// The shorter string is aligned against every substring of the longer one
/// and the smallest Levenshtein distance `d` found gives
/// `100 * (1 - d / len(shorter))`. A shorter string fully contained in the
/// longer one scores 100.
pub fn partial_similarity(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let (needle, haystack) = if a_len <= b_len { (a, b) } else { (b, a) };

    if needle.is_empty() {
        return if haystack.is_empty() { 100.0 } else { 0.0 };
    }
    if haystack.contains(needle) {
        return 100.0;
    }

    let needle: Vec<char> = needle.chars().collect();
    let distance = substring_edit_distance(&needle, haystack);
    100.0 * (1.0 - distance as f64 / needle.len() as f64)
}

/// Minimum edit distance between `needle` and any substring of `haystack`.
///
/// Column-wise dynamic programme where the alignment may start and end at any
/// haystack position at no cost.
fn substring_edit_distance(needle: &[char], haystack: &str) -> usize {
    let rows = needle.len();
    let mut previous: Vec<usize> = (0..=rows).collect();
    let mut current = vec![0usize; rows + 1];
    let mut best = rows;

    for hay in haystack.chars() {
        current[0] = 0;
        for (row, &ch) in needle.iter().enumerate() {
            let substitution = previous[row] + usize::from(ch != hay);
            let insertion = previous[row + 1] + 1;
            let deletion = current[row] + 1;
            current[row + 1] = substitution.min(insertion).min(deletion);
        }
        best = best.min(current[rows]);
        std::mem::swap(&mut previous, &mut current);
    }

    best
}

/// Returns the candidate scoring highest against `snippet`, or `None` when
/// there are no candidates. Ties go to the earliest candidate.
pub fn best_match<'a, S>(candidates: &'a [S], snippet: &str) -> Option<ParagraphMatch<'a>>
where
    S: AsRef<str>,
{
    let mut best: Option<ParagraphMatch<'a>> = None;
    for candidate in candidates {
        let text = candidate.as_ref();
        let score = partial_similarity(text, snippet);
        match best {
            Some(current) if current.score >= score => {}
            _ => best = Some(ParagraphMatch { text, score }),
        }
    }
    best
}

/// Run-wide telemetry: how many match attempts cleared the confidence bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub high_confidence: usize,
    pub total: usize,
}

impl MatchStats {
    pub fn record(&mut self, score: f64) {
        if score > HIGH_CONFIDENCE_THRESHOLD {
            self.high_confidence += 1;
        }
        self.total += 1;
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.high_confidence as f64 / self.total as f64
    }
}

impl fmt::Display for MatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Para match count: {} | Para total count: {} | ratio: {:.3}",
            self.high_confidence,
            self.total,
            self.ratio()
        )
    }
}
