use std::time::Duration;

use crate::adapters::adzuna::{AdzunaSearchRequest, AdzunaSource};
use crate::adapters::http_utils::{fetch_body, http_agent};
use crate::adapters::source::AdapterResult;
use crate::models::SourceId;

pub const DEFAULT_ADZUNA_URL: &str = "https://api.adzuna.com";
pub const DEFAULT_ADZUNA_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdzunaCredentials {
    pub app_id: String,
    pub app_key: String,
}

pub struct HttpAdzunaSource {
    agent: ureq::Agent,
    base_url: String,
    credentials: AdzunaCredentials,
}

impl HttpAdzunaSource {
    pub fn new(base_url: impl Into<String>, credentials: AdzunaCredentials, timeout: Duration) -> Self {
        Self {
            agent: http_agent(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn url_for(&self, request: &AdzunaSearchRequest) -> String {
        format!("{}{}", self.base_url, request.path())
    }
}

impl AdzunaSource for HttpAdzunaSource {
    fn search_jobs(&self, request: &AdzunaSearchRequest) -> AdapterResult<String> {
        let mut call = self
            .agent
            .get(&self.url_for(request))
            .set("Accept", "application/json")
            .query("app_id", &self.credentials.app_id)
            .query("app_key", &self.credentials.app_key)
            .query("content-type", "application/json");
        for (name, value) in request.query_pairs() {
            call = call.query(name, &value);
        }
        tracing::debug!(
            source = %SourceId::Adzuna,
            country = %request.country,
            page = request.page,
            "requesting Adzuna search page"
        );
        fetch_body(SourceId::Adzuna, call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_versioned_path() {
        let source = HttpAdzunaSource::new(
            "https://api.example.test/",
            AdzunaCredentials {
                app_id: "id".to_string(),
                app_key: "key".to_string(),
            },
            DEFAULT_ADZUNA_TIMEOUT,
        );
        let request = AdzunaSearchRequest {
            country: "gb".to_string(),
            page: 3,
            results_per_page: 20,
            what: String::new(),
            location: None,
            distance_km: None,
        };
        assert_eq!(
            source.url_for(&request),
            "https://api.example.test/v1/api/jobs/gb/search/3"
        );
    }
}
