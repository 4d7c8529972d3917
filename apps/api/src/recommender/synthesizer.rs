//! Listing Synthesizer: asks the model for job listings and repairs whatever comes back.
//!
//! Lenient: an unusable answer yields an empty list and a warning, never a
//! failed request. Only a failed call is an error.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{Gateway, ResponseShape};
use crate::recommender::json_kind;
use crate::recommender::models::{CandidateProfile, JobListing};
use crate::recommender::prompts::SYNTHESIZE_PROMPT_TEMPLATE;

pub const MAX_LISTINGS: usize = 12;
const FALLBACK_URL_BASE: &str = "https://jobs.example.com/";

// ────────────────────────────────────────────────────────────────────────────
// Response shape classification
// ────────────────────────────────────────────────────────────────────────────

/// The top-level shapes the model has been seen to answer with.
#[derive(Debug, PartialEq)]
enum RawListings {
    /// `[ {...}, {...} ]`, what the prompt asks for.
    Array(Vec<Value>),
    /// `{ "jobs": [ ... ] }`
    Wrapped(Vec<Value>),
    /// `{ "a": {...}, "b": {...} }`; each value is a candidate.
    Mapping(Vec<Value>),
    Unexpected(String),
}

impl RawListings {
    fn classify(raw: Value) -> Self {
        match raw {
            Value::Array(items) => RawListings::Array(items),
            Value::Object(mut map) => match map.remove("jobs") {
                Some(Value::Array(items)) => RawListings::Wrapped(items),
                Some(other) => RawListings::Unexpected(format!(
                    "object whose \"jobs\" is {}",
                    json_kind(&other)
                )),
                None => RawListings::Mapping(map.into_iter().map(|(_, v)| v).collect()),
            },
            other => RawListings::Unexpected(json_kind(&other).to_string()),
        }
    }

    fn into_candidates(self) -> Vec<Value> {
        match self {
            RawListings::Array(items) | RawListings::Wrapped(items) | RawListings::Mapping(items) => {
                items
            }
            RawListings::Unexpected(kind) => {
                warn!("Unexpected listings response shape: {kind}; returning no listings");
                Vec::new()
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-entry validation
// ────────────────────────────────────────────────────────────────────────────

/// Why a single candidate entry was dropped. Never fatal.
#[derive(Debug, Error, PartialEq)]
pub enum MalformedEntry {
    #[error("entry is {0}, not an object")]
    NotAnObject(&'static str),

    #[error("entry has no non-empty \"{0}\"")]
    MissingField(&'static str),
}

fn listing_from_value(value: &Value) -> Result<JobListing, MalformedEntry> {
    let fields = value
        .as_object()
        .ok_or_else(|| MalformedEntry::NotAnObject(json_kind(value)))?;

    let title = required_text(fields, "title")?;
    let company = required_text(fields, "company")?;
    let url = optional_text(fields, "url")
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| format!("{FALLBACK_URL_BASE}{}", slug(&title)));

    Ok(JobListing {
        location: optional_text(fields, "location").unwrap_or_default(),
        description: optional_text(fields, "description").unwrap_or_default(),
        source: optional_text(fields, "source").unwrap_or_default(),
        title,
        company,
        url,
    })
}

fn required_text(fields: &Map<String, Value>, key: &'static str) -> Result<String, MalformedEntry> {
    optional_text(fields, key)
        .filter(|s| !s.is_empty())
        .ok_or(MalformedEntry::MissingField(key))
}

fn optional_text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
}

/// URL-safe identifier for a title: lower-cased, spaces to hyphens, commas removed.
pub fn slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "-").replace(',', "")
}

/// Turns the model's raw answer into at most `MAX_LISTINGS` valid listings, order preserved.
fn normalize_listings(raw: Value) -> Vec<JobListing> {
    let candidates = RawListings::classify(raw).into_candidates();
    let total = candidates.len();

    let listings: Vec<JobListing> = candidates
        .iter()
        .filter_map(|candidate| match listing_from_value(candidate) {
            Ok(listing) => Some(listing),
            Err(reason) => {
                warn!("Dropping invalid listing entry ({reason}): {candidate}");
                None
            }
        })
        .take(MAX_LISTINGS)
        .collect();

    info!(
        "Normalized {} of {} candidate listings",
        listings.len(),
        total
    );
    listings
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Generates synthetic listings for `profile`.
///
/// Malformed model output degrades to an empty list; only a failed call returns `Err`.
pub async fn synthesize(
    profile: &CandidateProfile,
    gateway: &dyn Gateway,
) -> Result<Vec<JobListing>, AppError> {
    let prompt = build_synthesis_prompt(profile);

    match gateway.generate(&prompt, ResponseShape::Array).await {
        Ok(raw) => Ok(normalize_listings(raw)),
        Err(e) if e.is_malformed_output() => {
            warn!("Listing synthesis returned unusable output ({e}); returning no listings");
            Ok(Vec::new())
        }
        Err(e) => Err(AppError::Gateway(e)),
    }
}

fn build_synthesis_prompt(profile: &CandidateProfile) -> String {
    SYNTHESIZE_PROMPT_TEMPLATE
        .replace("{skills}", &profile.skills.join(", "))
        .replace("{job_titles}", &profile.job_titles.join(", "))
        .replace("{locations}", &profile.locations.join(", "))
        .replace("{experience}", profile.experience_level.as_str())
}
