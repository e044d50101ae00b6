//! Fuzzy location resolution.
//!
//! User input is free text and frequently misspelled; resolution scores the
//! query against every known station, district, and state name and keeps the
//! single best candidate. A candidate must clear [`MIN_SCORE`] to be viable,
//! otherwise resolution fails and the caller reports "no similar location".

use strsim::jaro_winkler;

// ---

/// Minimum Jaro-Winkler similarity for a candidate to be considered viable.
///
/// Low enough that a plausible typo of a known name clears it, high enough
/// that unrelated strings do not.
pub const MIN_SCORE: f64 = 0.55;

/// Best-matching known location name and its similarity score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationMatch {
    // ---
    pub name: String,
    pub score: f64,
}

/// Find the single most similar candidate to `query`, or `None` if the
/// candidate list is empty or nothing clears the viability threshold.
///
/// Ties break toward the earlier candidate in list order.
pub fn best_match(query: &str, candidates: &[String]) -> Option<LocationMatch> {
    // ---
    let mut best: Option<LocationMatch> = None;
    for candidate in candidates {
        let score = jaro_winkler(query, candidate);
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(LocationMatch {
                name: candidate.clone(),
                score,
            });
        }
    }
    best.filter(|m| m.score >= MIN_SCORE)
}
