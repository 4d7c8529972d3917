//! Query Interpreter: turns a free-text query into a `CandidateProfile`.
//!
//! The model's object is read field by field: a missing or wrong-typed field
//! falls back to its default instead of failing the request. Only an answer
//! that is not a JSON object at all is rejected.

use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::llm_client::{Gateway, ResponseShape};
use crate::recommender::json_kind;
use crate::recommender::models::{CandidateProfile, ExperienceLevel};
use crate::recommender::prompts::INTERPRET_PROMPT_TEMPLATE;

pub const MAX_SKILLS: usize = 15;
pub const MAX_SEARCH_KEYWORDS: usize = 5;
const KEYWORD_SKILLS: usize = 3;
const KEYWORD_TITLES: usize = 2;
const KEYWORD_LOCATIONS: usize = 2;
const FALLBACK_KEYWORDS: [&str; 3] = ["jobs", "careers", "employment"];

/// Extracts skills, titles, locations and experience level from `query`.
pub async fn interpret(query: &str, gateway: &dyn Gateway) -> Result<CandidateProfile, AppError> {
    let prompt = INTERPRET_PROMPT_TEMPLATE.replace("{query}", query);

    let raw = gateway
        .generate(&prompt, ResponseShape::Object)
        .await
        .map_err(|e| {
            if e.is_malformed_output() {
                AppError::Schema(format!("Query interpretation returned unusable output: {e}"))
            } else {
                AppError::Gateway(e)
            }
        })?;

    let fields = raw.as_object().ok_or_else(|| {
        AppError::Schema(format!(
            "Query interpretation expected a JSON object, got {}",
            json_kind(&raw)
        ))
    })?;

    Ok(profile_from_fields(fields))
}

/// Builds a profile from the model's object, defaulting any unusable field.
fn profile_from_fields(fields: &Map<String, Value>) -> CandidateProfile {
    let mut skills = string_list(fields.get("skills"));
    skills.truncate(MAX_SKILLS);
    let job_titles = string_list(fields.get("job_titles"));
    let locations = string_list(fields.get("locations"));
    let experience_level = fields
        .get("experience_level")
        .cloned()
        .and_then(|v| serde_json::from_value::<ExperienceLevel>(v).ok())
        .unwrap_or_default();

    let search_keywords = build_search_keywords(&skills, &job_titles, &locations);

    CandidateProfile {
        skills,
        job_titles,
        locations,
        experience_level,
        search_keywords,
    }
}

/// Reads a list of strings. Non-arrays become empty; non-string or blank items are dropped.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Derives job-portal search phrases: "{title} {skill}" pairs, then "jobs in {location}".
pub fn build_search_keywords(
    skills: &[String],
    job_titles: &[String],
    locations: &[String],
) -> Vec<String> {
    let mut keywords = Vec::new();

    for skill in skills.iter().take(KEYWORD_SKILLS) {
        for title in job_titles.iter().take(KEYWORD_TITLES) {
            keywords.push(format!("{title} {skill}"));
        }
    }

    for location in locations.iter().take(KEYWORD_LOCATIONS) {
        keywords.push(format!("jobs in {location}"));
    }

    if keywords.is_empty() {
        return FALLBACK_KEYWORDS.iter().map(|s| s.to_string()).collect();
    }

    keywords.truncate(MAX_SEARCH_KEYWORDS);
    keywords
}
