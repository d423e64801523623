use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::adapters::http_utils::parse_error;
use crate::adapters::job_bank::normalize_tag;
use crate::adapters::source::{
    AdapterResult, JobSourceAdapter, SourcePage, SourceRequest, mentioned_skills,
};
use crate::models::{Posting, SourceDescriptor, SourceId};
use crate::registry::ADZUNA_DESCRIPTOR;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdzunaSearchRequest {
    pub country: String,
    pub page: u32,
    pub results_per_page: u32,
    pub what: String,
    pub location: Option<String>,
    pub distance_km: Option<u32>,
}

impl AdzunaSearchRequest {
    /// Path below the API root, e.g. `/v1/api/jobs/ca/search/1`.
    pub fn path(&self) -> String {
        format!("/v1/api/jobs/{}/search/{}", self.country, self.page)
    }

    /// Query parameters other than credentials.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("results_per_page", self.results_per_page.to_string())];
        if !self.what.is_empty() {
            pairs.push(("what", self.what.clone()));
        }
        if let Some(location) = &self.location {
            pairs.push(("where", location.clone()));
        }
        if let Some(distance) = self.distance_km {
            pairs.push(("distance", distance.to_string()));
        }
        pairs
    }
}

pub trait AdzunaSource: Send + Sync {
    fn search_jobs(&self, request: &AdzunaSearchRequest) -> AdapterResult<String>;
}

pub struct AdzunaAdapter<S: AdzunaSource> {
    source: S,
}

impl<S: AdzunaSource> AdzunaAdapter<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: AdzunaSource> JobSourceAdapter for AdzunaAdapter<S> {
    fn descriptor(&self) -> &SourceDescriptor {
        &ADZUNA_DESCRIPTOR
    }

    fn search(&self, request: &SourceRequest) -> AdapterResult<SourcePage> {
        let raw = self.source.search_jobs(&adzuna_search_request(request))?;
        parse_search_page(&raw, request)
    }
}

pub fn adzuna_search_request(request: &SourceRequest) -> AdzunaSearchRequest {
    AdzunaSearchRequest {
        country: request.query.country.trim().to_ascii_lowercase(),
        page: request.page,
        results_per_page: request.per_page,
        what: request.keywords.clone(),
        location: request.query.location_term().map(str::to_string),
        distance_km: request.query.radius_km,
    }
}

#[derive(Debug, Deserialize)]
struct AdzunaResponse {
    count: Option<usize>,
    #[serde(default)]
    results: Vec<AdzunaJob>,
}

#[derive(Debug, Deserialize)]
struct AdzunaJob {
    id: Option<Value>,
    title: Option<String>,
    #[serde(default)]
    description: String,
    company: Option<AdzunaLabel>,
    location: Option<AdzunaLocation>,
    category: Option<AdzunaCategory>,
    contract_time: Option<String>,
    created: Option<String>,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AdzunaLabel {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AdzunaLocation {
    display_name: Option<String>,
    #[serde(default)]
    area: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AdzunaCategory {
    label: Option<String>,
}

fn parse_search_page(raw: &str, request: &SourceRequest) -> AdapterResult<SourcePage> {
    let response: AdzunaResponse = serde_json::from_str(raw)
        .map_err(|error| parse_error(SourceId::Adzuna, format!("invalid Adzuna JSON: {error}")))?;

    let vocabulary = request.skill_vocabulary();
    let listed = response.results.len();
    let postings: Vec<Posting> = response
        .results
        .into_iter()
        .filter_map(|job| convert_job(job, &vocabulary))
        .collect();

    if postings.is_empty() && listed > 0 {
        return Err(parse_error(
            SourceId::Adzuna,
            "unable to parse any Adzuna results",
        ));
    }

    let total_count = response.count.unwrap_or(postings.len()).max(postings.len());
    Ok(SourcePage::new(postings, total_count, request.per_page))
}

fn convert_job(job: AdzunaJob, vocabulary: &[String]) -> Option<Posting> {
    let id = match job.id? {
        Value::String(id) => id,
        Value::Number(id) => id.to_string(),
        _ => return None,
    };
    let id = id.trim().to_string();
    let title = job.title.map(|title| title.trim().to_string())?;
    if id.is_empty() || title.is_empty() {
        return None;
    }

    let employer = job
        .company
        .and_then(|company| company.display_name)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Confidential".to_string());
    let location = job.location.map(location_label).unwrap_or_default();

    let mut posting = Posting::new(SourceId::Adzuna, id, title, employer, location);
    posting.remote = mentions_remote(&posting.title) || mentions_remote(&job.description);
    posting.required_skills = mentioned_skills(
        &format!("{} {}", posting.title, job.description),
        vocabulary,
    );
    posting.description = job.description;
    posting.industry = job
        .category
        .and_then(|category| category.label)
        .filter(|label| !label.trim().is_empty());
    posting.job_type = job
        .contract_time
        .filter(|value| !value.trim().is_empty())
        .map(|value| normalize_tag(&value));
    posting.salary = salary_range(job.salary_min, job.salary_max);
    posting.posted_at = job
        .created
        .as_deref()
        .and_then(|created| OffsetDateTime::parse(created, &Rfc3339).ok());
    Some(posting)
}

fn location_label(location: AdzunaLocation) -> String {
    match location.display_name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => location.area.iter().rev().take(2).rev().cloned().collect::<Vec<_>>().join(", "),
    }
}

fn mentions_remote(text: &str) -> bool {
    text.split(|ch: char| !ch.is_alphanumeric())
        .any(|word| word.eq_ignore_ascii_case("remote"))
}

fn salary_range(min: Option<f64>, max: Option<f64>) -> Option<String> {
    match (min, max) {
        (Some(min), Some(max)) if (max - min).abs() >= 1.0 => {
            Some(format!("{:.0}-{:.0}", min, max))
        }
        (Some(value), _) | (None, Some(value)) => Some(format!("{value:.0}")),
        (None, None) => None,
    }
}
