use serde::Deserialize;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::adapters::http_utils::parse_error;
use crate::adapters::source::{AdapterResult, JobSourceAdapter, SourcePage, SourceRequest};
use crate::models::{Posting, SourceDescriptor, SourceId};
use crate::registry::JOB_BANK_DESCRIPTOR;

/// Query-string parameters understood by the Job Bank search endpoint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobBankSearchRequest {
    pub search_string: String,
    pub location_string: Option<String>,
    pub distance_km: Option<u32>,
    pub page: u32,
    pub rows: u32,
}

impl JobBankSearchRequest {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("searchstring", self.search_string.clone()),
            ("sort", "M".to_string()),
            ("page", self.page.to_string()),
            ("rows", self.rows.to_string()),
        ];
        if let Some(location) = &self.location_string {
            pairs.push(("locationstring", location.clone()));
        }
        if let Some(distance) = self.distance_km {
            pairs.push(("dist", distance.to_string()));
        }
        pairs
    }
}

pub trait JobBankSource: Send + Sync {
    /// Raw JSON body of one search page.
    fn search_jobs(&self, request: &JobBankSearchRequest) -> AdapterResult<String>;
}

pub struct JobBankAdapter<S: JobBankSource> {
    source: S,
}

impl<S: JobBankSource> JobBankAdapter<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: JobBankSource> JobSourceAdapter for JobBankAdapter<S> {
    fn descriptor(&self) -> &SourceDescriptor {
        &JOB_BANK_DESCRIPTOR
    }

    fn search(&self, request: &SourceRequest) -> AdapterResult<SourcePage> {
        let raw = self.source.search_jobs(&job_bank_search_request(request))?;
        parse_search_page(&raw, request.per_page)
    }
}

pub fn job_bank_search_request(request: &SourceRequest) -> JobBankSearchRequest {
    JobBankSearchRequest {
        search_string: request.keywords.clone(),
        location_string: request.query.location_term().map(str::to_string),
        distance_km: request.query.radius_km,
        page: request.page,
        rows: request.per_page,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobBankSearchResponse {
    total_count: Option<usize>,
    #[serde(default)]
    jobs: Vec<JobBankJob>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobBankJob {
    job_id: Option<String>,
    title: Option<String>,
    employer_name: Option<String>,
    location: Option<String>,
    #[serde(default)]
    description: String,
    employment_type: Option<String>,
    industry: Option<String>,
    experience: Option<String>,
    education: Option<String>,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    assets: Vec<String>,
    noc: Option<String>,
    security_clearance: Option<String>,
    #[serde(default)]
    telework: bool,
    salary: Option<String>,
    date_posted: Option<String>,
}

fn parse_search_page(raw: &str, per_page: u32) -> AdapterResult<SourcePage> {
    let response: JobBankSearchResponse = serde_json::from_str(raw)
        .map_err(|error| parse_error(SourceId::JobBank, format!("invalid Job Bank JSON: {error}")))?;

    let listed = response.jobs.len();
    let postings: Vec<Posting> = response.jobs.into_iter().filter_map(convert_job).collect();

    if postings.is_empty() && listed > 0 {
        return Err(parse_error(
            SourceId::JobBank,
            "unable to parse any Job Bank listings",
        ));
    }

    let total_count = response.total_count.unwrap_or(postings.len()).max(postings.len());
    Ok(SourcePage::new(postings, total_count, per_page))
}

fn convert_job(job: JobBankJob) -> Option<Posting> {
    let id = non_empty(job.job_id)?;
    let title = non_empty(job.title)?;
    let employer = non_empty(job.employer_name).unwrap_or_else(|| "Confidential".to_string());
    let location = non_empty(job.location).unwrap_or_default();

    let mut posting = Posting::new(SourceId::JobBank, id, title, employer, location);
    posting.description = job.description;
    posting.job_type = non_empty(job.employment_type).map(|value| normalize_tag(&value));
    posting.industry = non_empty(job.industry);
    posting.experience = non_empty(job.experience);
    posting.education = non_empty(job.education);
    posting.required_skills = job.skills;
    posting.preferred_skills = job.assets;
    posting.occupational_codes = non_empty(job.noc).into_iter().collect();
    posting.clearance = non_empty(job.security_clearance);
    posting.remote = job.telework;
    posting.salary = non_empty(job.salary);
    posting.posted_at = job.date_posted.as_deref().and_then(parse_posted_date);
    Some(posting)
}

fn parse_posted_date(value: &str) -> Option<OffsetDateTime> {
    let date = Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).ok()?;
    Some(date.midnight().assume_utc())
}

/// "Full time" and "full_time" both become "full-time".
pub(crate) fn normalize_tag(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split(|ch: char| ch.is_whitespace() || ch == '_' || ch == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use time::macros::datetime;

    use crate::models::{CoreErrorKind, JobQuery, ProviderCause};

    use super::*;

    struct FixtureSource {
        body: AdapterResult<String>,
        seen: Mutex<Vec<JobBankSearchRequest>>,
    }

    impl FixtureSource {
        fn new(body: AdapterResult<String>) -> Self {
            Self {
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl JobBankSource for FixtureSource {
        fn search_jobs(&self, request: &JobBankSearchRequest) -> AdapterResult<String> {
            self.seen.lock().unwrap().push(request.clone());
            self.body.clone()
        }
    }

    const FIXTURE: &str = r#"{
        "totalCount": 57,
        "jobs": [
            {
                "jobId": "39912345",
                "title": "Material Handler",
                "employerName": "Northern Freight Ltd.",
                "location": "Toronto, ON",
                "description": "Move and track inventory.",
                "employmentType": "Full time",
                "industry": "Transportation",
                "experience": "1 year to less than 2 years",
                "education": "Secondary school",
                "skills": ["Inventory control", "Forklift"],
                "assets": ["Bilingual"],
                "noc": "75101",
                "securityClearance": "Reliability",
                "telework": false,
                "salary": "$24.00 hourly",
                "datePosted": "2024-05-01"
            },
            { "jobId": "39912346", "title": "  " },
            { "jobId": "39912347", "title": "Dispatcher", "telework": true }
        ]
    }"#;

    fn request() -> SourceRequest {
        SourceRequest::new(
            JobQuery::new("logistics")
                .with_location(" Toronto ")
                .with_radius_km(25),
            "logistics supply chain",
            2,
            20,
        )
    }

    #[test]
    fn translates_query_into_query_string() {
        let source = FixtureSource::new(Ok(FIXTURE.to_string()));
        let adapter = JobBankAdapter::new(source);
        adapter.search(&request()).unwrap();

        let seen = adapter.source.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            JobBankSearchRequest {
                search_string: "logistics supply chain".to_string(),
                location_string: Some("Toronto".to_string()),
                distance_km: Some(25),
                page: 2,
                rows: 20,
            }
        );
        assert!(seen[0].query_pairs().contains(&("dist", "25".to_string())));
    }

    #[test]
    fn parses_listings_and_skips_malformed_entries() {
        let adapter = JobBankAdapter::new(FixtureSource::new(Ok(FIXTURE.to_string())));
        let page = adapter.search(&request()).unwrap();

        assert_eq!(page.total_count, 57);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.postings.len(), 2);

        let handler = &page.postings[0];
        assert_eq!(handler.source, SourceId::JobBank);
        assert_eq!(handler.job_type.as_deref(), Some("full-time"));
        assert_eq!(handler.required_skills, vec!["Inventory control", "Forklift"]);
        assert_eq!(handler.occupational_codes, vec!["75101"]);
        assert_eq!(handler.posted_at, Some(datetime!(2024-05-01 0:00 UTC)));

        let dispatcher = &page.postings[1];
        assert_eq!(dispatcher.employer, "Confidential");
        assert!(dispatcher.remote);
    }

    #[test]
    fn invalid_json_is_a_parse_failure() {
        let adapter = JobBankAdapter::new(FixtureSource::new(Ok("<html>".to_string())));
        let error = adapter.search(&request()).unwrap_err();
        assert_eq!(error.kind, CoreErrorKind::Provider(ProviderCause::ParseFailure));
        assert_eq!(error.provider, Some(SourceId::JobBank));
    }

    #[test]
    fn no_jobs_is_an_empty_page() {
        let adapter = JobBankAdapter::new(FixtureSource::new(Ok(r#"{"totalCount":0}"#.to_string())));
        let page = adapter.search(&request()).unwrap();
        assert!(page.postings.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn source_errors_propagate_unchanged() {
        let failure = crate::models::CoreError::provider(
            SourceId::JobBank,
            ProviderCause::RateLimited,
            "HTTP 429",
        );
        let adapter = JobBankAdapter::new(FixtureSource::new(Err(failure.clone())));
        assert_eq!(adapter.search(&request()).unwrap_err(), failure);
    }

    #[test]
    fn tags_normalize_separators() {
        assert_eq!(normalize_tag("Full time"), "full-time");
        assert_eq!(normalize_tag("PART_TIME"), "part-time");
        assert_eq!(normalize_tag(" contract "), "contract");
    }
}
