use serde::{Deserialize, Serialize};

/// How much experience the candidate appears to have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceLevel {
    #[default]
    EntryLevel,
    MidLevel,
    Experienced,
}

impl ExperienceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::EntryLevel => "entry-level",
            ExperienceLevel::MidLevel => "mid-level",
            ExperienceLevel::Experienced => "experienced",
        }
    }
}

/// Structured candidate attributes extracted from one free-text query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub skills: Vec<String>,
    pub job_titles: Vec<String>,
    pub locations: Vec<String>,
    pub experience_level: ExperienceLevel,
    pub search_keywords: Vec<String>,
}

/// A synthetic job posting in canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub source: String,
}

/// A listing with its skill-match outcome attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredListing {
    #[serde(flatten)]
    pub listing: JobListing,
    /// 0 – 100, two decimal places.
    pub match_score: f64,
    pub skills_matched: Vec<String>,
    pub skills_missing: Vec<String>,
}

/// Final payload returned for one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    #[serde(flatten)]
    pub profile: CandidateProfile,
    pub total_jobs_found: usize,
    pub best_matches: Vec<ScoredListing>,
    pub other_jobs: Vec<ScoredListing>,
}
