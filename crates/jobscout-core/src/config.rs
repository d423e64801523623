use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapters::{
    AdzunaAdapter, AdzunaCredentials, DEFAULT_ADZUNA_URL, DEFAULT_JOB_BANK_URL,
    EmployerDirectoryAdapter, HttpAdzunaSource, HttpJobBankSource, JobBankAdapter,
    JobSourceAdapter, SyntheticAdapter,
};
use crate::cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, InMemorySearchCache, SearchCacheStore};
use crate::matching::{LocationFilterConfig, SkillMatchConfig, SkillTranslator};
use crate::models::{CoreError, CoreResult};
use crate::orchestration::{
    AggregatorConfig, DEFAULT_PAGE_SIZE, DEFAULT_POOL_SIZE, DEFAULT_SOURCE_TIMEOUT, FallbackPolicy,
    MultiSourceAggregator,
};

pub const ENV_ADZUNA_APP_ID: &str = "JOBSCOUT_ADZUNA_APP_ID";
pub const ENV_ADZUNA_APP_KEY: &str = "JOBSCOUT_ADZUNA_APP_KEY";
pub const ENV_JOB_BANK_URL: &str = "JOBSCOUT_JOB_BANK_URL";
pub const ENV_CACHE_TTL_SECS: &str = "JOBSCOUT_CACHE_TTL_SECS";

const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobscoutConfig {
    pub cache: CacheSection,
    pub aggregator: AggregatorSection,
    pub job_bank: JobBankSection,
    pub adzuna: AdzunaSection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub ttl_secs: u64,
    pub capacity: usize,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorSection {
    pub policy: FallbackPolicy,
    pub source_timeout_ms: u64,
    pub page_size: u32,
    pub pool_size: u32,
    pub location: LocationSection,
    pub skill_prefix_len: usize,
}

impl Default for AggregatorSection {
    fn default() -> Self {
        Self {
            policy: FallbackPolicy::default(),
            source_timeout_ms: DEFAULT_SOURCE_TIMEOUT.as_millis() as u64,
            page_size: DEFAULT_PAGE_SIZE,
            pool_size: DEFAULT_POOL_SIZE,
            location: LocationSection::default(),
            skill_prefix_len: SkillMatchConfig::default().prefix_len,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSection {
    pub min_strict_matches: usize,
    pub lenient_pool_threshold: usize,
    pub lenient_token_ratio: f64,
}

impl Default for LocationSection {
    fn default() -> Self {
        let defaults = LocationFilterConfig::default();
        Self {
            min_strict_matches: defaults.min_strict_matches,
            lenient_pool_threshold: defaults.lenient_pool_threshold,
            lenient_token_ratio: defaults.lenient_token_ratio,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobBankSection {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for JobBankSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_JOB_BANK_URL.to_string(),
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdzunaSection {
    pub base_url: String,
    pub app_id: Option<String>,
    pub app_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for AdzunaSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ADZUNA_URL.to_string(),
            app_id: None,
            app_key: None,
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

impl AdzunaSection {
    /// Both halves of the credential pair, when present and non-blank.
    pub fn credentials(&self) -> Option<AdzunaCredentials> {
        let app_id = self.app_id.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
        let app_key = self.app_key.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
        Some(AdzunaCredentials {
            app_id: app_id.to_string(),
            app_key: app_key.to_string(),
        })
    }
}

impl JobscoutConfig {
    /// Reads `path` when given, then applies `JOBSCOUT_*` overrides from the
    /// process environment.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|error| {
            CoreError::configuration(format!("read config {}: {error}", path.display()))
        })?;
        Self::from_json(&raw).map_err(|error| {
            CoreError::configuration(format!("{}: {}", path.display(), error.message))
        })
    }

    pub fn from_json(raw: &str) -> CoreResult<Self> {
        serde_json::from_str(raw)
            .map_err(|error| CoreError::configuration(format!("parse config: {error}")))
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> CoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = non_blank(lookup(ENV_ADZUNA_APP_ID)) {
            self.adzuna.app_id = Some(value);
        }
        if let Some(value) = non_blank(lookup(ENV_ADZUNA_APP_KEY)) {
            self.adzuna.app_key = Some(value);
        }
        if let Some(value) = non_blank(lookup(ENV_JOB_BANK_URL)) {
            self.job_bank.base_url = value;
        }
        if let Some(value) = non_blank(lookup(ENV_CACHE_TTL_SECS)) {
            self.cache.ttl_secs = value.parse().map_err(|_| {
                CoreError::configuration(format!(
                    "{ENV_CACHE_TTL_SECS} must be a whole number of seconds, got '{value}'"
                ))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.cache.ttl_secs == 0 {
            return Err(CoreError::configuration("cache.ttl_secs must be positive"));
        }
        if self.cache.capacity == 0 {
            return Err(CoreError::configuration("cache.capacity must be positive"));
        }

        let aggregator = &self.aggregator;
        if aggregator.source_timeout_ms == 0 {
            return Err(CoreError::configuration(
                "aggregator.source_timeout_ms must be positive",
            ));
        }
        if aggregator.page_size == 0 || aggregator.pool_size == 0 {
            return Err(CoreError::configuration(
                "aggregator.page_size and aggregator.pool_size must be positive",
            ));
        }
        let ratio = aggregator.location.lenient_token_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(CoreError::configuration(format!(
                "aggregator.location.lenient_token_ratio must be in (0, 1], got {ratio}"
            )));
        }
        if aggregator.skill_prefix_len == 0 {
            return Err(CoreError::configuration(
                "aggregator.skill_prefix_len must be positive",
            ));
        }

        if self.job_bank.base_url.trim().is_empty() {
            return Err(CoreError::configuration("job_bank.base_url must not be empty"));
        }
        if self.adzuna.app_id.is_some() != self.adzuna.app_key.is_some() {
            return Err(CoreError::configuration(
                "adzuna.app_id and adzuna.app_key must be set together",
            ));
        }
        Ok(())
    }

    pub fn aggregator_config(&self) -> AggregatorConfig {
        let section = &self.aggregator;
        AggregatorConfig {
            policy: section.policy,
            source_timeout: Duration::from_millis(section.source_timeout_ms),
            page_size: section.page_size,
            pool_size: section.pool_size,
            location: LocationFilterConfig {
                min_strict_matches: section.location.min_strict_matches,
                lenient_pool_threshold: section.location.lenient_pool_threshold,
                lenient_token_ratio: section.location.lenient_token_ratio,
            },
            skill_match: SkillMatchConfig {
                prefix_len: section.skill_prefix_len,
            },
        }
    }

    pub fn build_cache(&self) -> Arc<dyn SearchCacheStore> {
        Arc::new(InMemorySearchCache::with_clock(
            Duration::from_secs(self.cache.ttl_secs),
            self.cache.capacity,
            Arc::new(crate::cache::SystemClock),
        ))
    }

    /// Built-in sources. Adzuna is only included when credentials are
    /// configured.
    pub fn build_sources(&self) -> Vec<Arc<dyn JobSourceAdapter>> {
        let mut sources: Vec<Arc<dyn JobSourceAdapter>> = vec![Arc::new(JobBankAdapter::new(
            HttpJobBankSource::new(
                self.job_bank.base_url.clone(),
                Duration::from_millis(self.job_bank.timeout_ms),
            ),
        ))];

        match self.adzuna.credentials() {
            Some(credentials) => sources.push(Arc::new(AdzunaAdapter::new(HttpAdzunaSource::new(
                self.adzuna.base_url.clone(),
                credentials,
                Duration::from_millis(self.adzuna.timeout_ms),
            )))),
            None => tracing::debug!("Adzuna credentials not configured; source disabled"),
        }

        sources.push(Arc::new(EmployerDirectoryAdapter::builtin()));
        sources.push(Arc::new(SyntheticAdapter::default()));
        sources
    }

    pub fn build_aggregator(&self, cache: Arc<dyn SearchCacheStore>) -> CoreResult<MultiSourceAggregator> {
        MultiSourceAggregator::with_config(
            self.build_sources(),
            cache,
            SkillTranslator::military(),
            self.aggregator_config(),
        )
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
