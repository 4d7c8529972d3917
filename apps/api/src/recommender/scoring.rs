//! Match Scoring: deterministic skill coverage per listing, then a stable rank.
//!
//! Algorithm:
//! 1. Lower-case title, description and location of the listing.
//! 2. A skill matches if its lower-cased text is a substring of any of the three.
//! 3. match_score = matched / skills × 100, rounded to 2 decimals (50 when there are no skills).
//! 4. Stable sort by match_score descending.
//!
//! Substring matching is intentionally naive: a short skill such as "R" also
//! matches inside "Marketing".

use crate::recommender::models::{JobListing, ScoredListing};

/// Score given to every listing when the candidate has no skills to compare.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Scores every listing against `skills` and returns them best-first.
/// Listings with equal scores keep their incoming order.
pub fn score_listings(listings: Vec<JobListing>, skills: &[String]) -> Vec<ScoredListing> {
    let mut scored: Vec<ScoredListing> = listings
        .into_iter()
        .map(|listing| score_listing(listing, skills))
        .collect();

    // `sort_by` is stable, which keeps ties in synthesis order.
    scored.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    scored
}

fn score_listing(listing: JobListing, skills: &[String]) -> ScoredListing {
    let title = listing.title.to_lowercase();
    let description = listing.description.to_lowercase();
    let location = listing.location.to_lowercase();

    let (skills_matched, skills_missing): (Vec<String>, Vec<String>) =
        skills.iter().cloned().partition(|skill| {
            let skill = skill.to_lowercase();
            title.contains(&skill) || description.contains(&skill) || location.contains(&skill)
        });

    let match_score = if skills.is_empty() {
        NEUTRAL_SCORE
    } else {
        round2(skills_matched.len() as f64 / skills.len() as f64 * 100.0)
    };

    ScoredListing {
        listing,
        match_score,
        skills_matched,
        skills_missing,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
