use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::SourceId;

const DEDUP_SEPARATOR: char = '\u{1f}';

/// A single job listing as produced by one source.
///
/// Identifiers are only unique within their `source`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub id: String,
    pub title: String,
    pub employer: String,
    pub location: String,
    pub description: String,
    pub job_type: Option<String>,
    pub industry: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub occupational_codes: Vec<String>,
    pub clearance: Option<String>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub remote: bool,
    pub salary: Option<String>,
    pub source: SourceId,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub posted_at: Option<OffsetDateTime>,
    pub match_score: Option<u8>,
    pub matching_skills: Vec<String>,
}

impl Posting {
    pub fn new(
        source: SourceId,
        id: impl Into<String>,
        title: impl Into<String>,
        employer: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            employer: employer.into(),
            location: location.into(),
            description: String::new(),
            job_type: None,
            industry: None,
            experience: None,
            education: None,
            occupational_codes: Vec::new(),
            clearance: None,
            required_skills: Vec::new(),
            preferred_skills: Vec::new(),
            remote: false,
            salary: None,
            source,
            posted_at: None,
            match_score: None,
            matching_skills: Vec::new(),
        }
    }

    /// Cross-source identity: lower-cased title plus employer.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}{DEDUP_SEPARATOR}{}",
            self.title.trim().to_lowercase(),
            self.employer.trim().to_lowercase()
        )
    }
}
