//! Additive substring scoring of catalog candidates.
//!
//! Each field (title, artist) can earn a raw bonus when the lower-cased query
//! and candidate contain one another, and a normalized bonus when their
//! diacritic/punctuation-stripped forms do. The conditions are independent, so
//! a perfect match earns all four bonuses.
//!
//! There is no edit distance here: a misspelled query only scores if the
//! misspelling survives as a substring. Well-formed queries match precisely,
//! heavily misspelled ones fall through to "not found".

use super::normalize::fold;
use crate::models::CandidateMatch;

/// Maximum score with the default weights.
pub const MAX_SCORE: u32 = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWeights {
    pub raw_match: u32,
    pub normalized_match: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            raw_match: 50,
            normalized_match: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchScorer {
    weights: ScoreWeights,
}

impl MatchScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    pub fn score(&self, query_title: &str, query_artist: &str, candidate: &CandidateMatch) -> u32 {
        self.field_score(query_title, &candidate.track_name)
            + self.field_score(query_artist, &candidate.artist_name)
    }

    fn field_score(&self, query: &str, found: &str) -> u32 {
        let mut score = 0;

        if mutual_substring(&query.to_lowercase(), &found.to_lowercase()) {
            score += self.weights.raw_match;
        }
        if mutual_substring(&fold(query), &fold(found)) {
            score += self.weights.normalized_match;
        }

        score
    }
}

// An empty side is a substring of anything, so it never counts as a match.
fn mutual_substring(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}
