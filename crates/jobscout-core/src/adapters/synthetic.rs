use std::hash::{DefaultHasher, Hash, Hasher};

use crate::adapters::source::{AdapterResult, JobSourceAdapter, SourcePage, SourceRequest};
use crate::models::{Posting, SourceDescriptor, SourceId};
use crate::registry::SYNTHETIC_DESCRIPTOR;

pub const DEFAULT_SYNTHETIC_COUNT: usize = 12;
const FALLBACK_LOCATION: &str = "Canada";
const FALLBACK_ROLE: &str = "General";
const MAX_ROLE_WORDS: usize = 3;

const TITLE_PATTERNS: &[&str] = &[
    "{} Coordinator",
    "{} Specialist",
    "{} Technician",
    "{} Team Lead",
    "{} Analyst",
    "{} Supervisor",
];

const EMPLOYERS: &[&str] = &[
    "Northern Shield Services",
    "Maple Leaf Logistics",
    "True North Technical",
    "Harbourfront Operations",
    "Prairie Field Solutions",
    "Atlantic Support Group",
    "Summit Workforce Partners",
];

/// Last-resort source that fabricates postings shaped after the query so the
/// chain always yields something. Output is a pure function of the request.
pub struct SyntheticAdapter {
    count: usize,
}

impl SyntheticAdapter {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl Default for SyntheticAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_SYNTHETIC_COUNT)
    }
}

impl JobSourceAdapter for SyntheticAdapter {
    fn descriptor(&self) -> &SourceDescriptor {
        &SYNTHETIC_DESCRIPTOR
    }

    fn search(&self, request: &SourceRequest) -> AdapterResult<SourcePage> {
        let seed = seed_for(request);
        let per_page = request.per_page.max(1) as usize;
        let start = (request.page.max(1) as usize - 1).saturating_mul(per_page);
        let end = self.count.min(start.saturating_add(per_page));

        let postings = (start..end)
            .map(|index| synthesize(request, seed, index))
            .collect();
        Ok(SourcePage::new(postings, self.count, request.per_page))
    }
}

fn seed_for(request: &SourceRequest) -> u64 {
    let mut hasher = DefaultHasher::new();
    request.query.fingerprint().hash(&mut hasher);
    request.keywords.hash(&mut hasher);
    hasher.finish()
}

fn synthesize(request: &SourceRequest, seed: u64, index: usize) -> Posting {
    let query = &request.query;
    let role = role_name(&query.keywords);
    let offset = (seed % 997) as usize + index;
    let pattern = TITLE_PATTERNS[offset % TITLE_PATTERNS.len()];
    let employer = EMPLOYERS[(offset / TITLE_PATTERNS.len() + index) % EMPLOYERS.len()];
    let location = query.location_term().unwrap_or(FALLBACK_LOCATION);

    let mut posting = Posting::new(
        SourceId::Synthetic,
        format!("synthetic-{seed:016x}-{index}"),
        pattern.replace("{}", &role),
        employer,
        location,
    );
    posting.description = format!(
        "{} opportunity with {employer} in {location}. Generated while live sources were unavailable.",
        posting.title
    );
    posting.job_type = Some(query.job_type.clone().unwrap_or_else(|| "full-time".to_string()));
    posting.industry = query.industry.clone();
    posting.experience = query.experience.clone();
    posting.education = query.education.clone();
    posting.required_skills = request.skill_vocabulary();
    posting
}

fn role_name(keywords: &str) -> String {
    let words: Vec<String> = keywords
        .split_whitespace()
        .take(MAX_ROLE_WORDS)
        .map(capitalize)
        .collect();
    if words.is_empty() {
        FALLBACK_ROLE.to_string()
    } else {
        words.join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
