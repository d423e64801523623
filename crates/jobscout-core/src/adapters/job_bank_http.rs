use std::time::Duration;

use crate::adapters::http_utils::{fetch_body, http_agent};
use crate::adapters::job_bank::{JobBankSearchRequest, JobBankSource};
use crate::adapters::source::AdapterResult;
use crate::models::SourceId;

pub const DEFAULT_JOB_BANK_URL: &str = "https://www.jobbank.gc.ca/jobsearch/api/v1/jobs";
pub const DEFAULT_JOB_BANK_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpJobBankSource {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpJobBankSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: http_agent(timeout),
            base_url: base_url.into(),
        }
    }
}

impl Default for HttpJobBankSource {
    fn default() -> Self {
        Self::new(DEFAULT_JOB_BANK_URL, DEFAULT_JOB_BANK_TIMEOUT)
    }
}

impl JobBankSource for HttpJobBankSource {
    fn search_jobs(&self, request: &JobBankSearchRequest) -> AdapterResult<String> {
        let mut call = self
            .agent
            .get(&self.base_url)
            .set("Accept", "application/json");
        for (name, value) in request.query_pairs() {
            call = call.query(name, &value);
        }
        tracing::debug!(
            source = %SourceId::JobBank,
            page = request.page,
            rows = request.rows,
            "requesting Job Bank search page"
        );
        fetch_body(SourceId::JobBank, call)
    }
}
