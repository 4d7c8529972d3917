//! Recommendation Orchestrator: runs the pipeline for one query and shapes the result.

use std::sync::Arc;

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::Gateway;
use crate::recommender::interpreter::interpret;
use crate::recommender::models::RecommendationResult;
use crate::recommender::scoring::score_listings;
use crate::recommender::synthesizer::synthesize;

pub const BEST_MATCHES_LIMIT: usize = 10;
pub const OTHER_JOBS_LIMIT: usize = 10;

/// Stateless apart from the gateway it was built with; safe to share across requests.
#[derive(Clone)]
pub struct Recommender {
    gateway: Arc<dyn Gateway>,
}

impl Recommender {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Full pipeline: interpret → synthesize → score → split into tiers.
    ///
    /// The first failing stage's error is returned as-is; nothing is retried here.
    pub async fn recommend(&self, query: &str) -> Result<RecommendationResult, AppError> {
        // Step 1: Interpret the query
        let profile = interpret(query, self.gateway.as_ref()).await?;
        info!(
            "Query interpreted: {} skills, {} titles, level={}",
            profile.skills.len(),
            profile.job_titles.len(),
            profile.experience_level.as_str()
        );

        // Step 2: Synthesize listings
        let listings = synthesize(&profile, self.gateway.as_ref()).await?;
        let total_jobs_found = listings.len();

        // Step 3: Score and rank
        let mut ranked = score_listings(listings, &profile.skills).into_iter();

        // Step 4: Tiers
        let best_matches: Vec<_> = ranked.by_ref().take(BEST_MATCHES_LIMIT).collect();
        let other_jobs: Vec<_> = ranked.take(OTHER_JOBS_LIMIT).collect();

        info!(
            "Recommended {} best matches and {} other jobs out of {}",
            best_matches.len(),
            other_jobs.len(),
            total_jobs_found
        );

        Ok(RecommendationResult {
            profile,
            total_jobs_found,
            best_matches,
            other_jobs,
        })
    }
}
