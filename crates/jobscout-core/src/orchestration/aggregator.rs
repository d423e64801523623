use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapters::{JobSourceAdapter, SourcePage, SourceRequest};
use crate::cache::SearchCacheStore;
use crate::matching::{LocationFilterConfig, LocationMatcher, SkillMatchConfig, SkillTranslator};
use crate::models::{
    CoreError, CoreErrorKind, CoreResult, JobQuery, Posting, ProviderCause, SearchOptions,
    SearchResult, SourceDescriptor, SourceId,
};
use crate::orchestration::filters::PoolFilter;
use crate::orchestration::priority::fallback_chain;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_POOL_SIZE: u32 = 100;
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(15);

/// How far the walk goes once a source has produced postings.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Stop at the first source returning at least one posting.
    #[default]
    FirstSuccess,
    /// Call every source and merge, dropping later duplicates.
    MergeAll,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AggregatorConfig {
    pub policy: FallbackPolicy,
    pub source_timeout: Duration,
    pub page_size: u32,
    /// Postings requested from each source before filtering.
    pub pool_size: u32,
    pub location: LocationFilterConfig,
    pub skill_match: SkillMatchConfig,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            policy: FallbackPolicy::default(),
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            pool_size: DEFAULT_POOL_SIZE,
            location: LocationFilterConfig::default(),
            skill_match: SkillMatchConfig::default(),
        }
    }
}

struct WalkOutcome {
    pool: Vec<Posting>,
    sources: Vec<SourceId>,
}

/// Fans a query out over the registered sources in fallback order and folds
/// the answers into one cached, filtered, paginated result.
pub struct MultiSourceAggregator {
    adapters: Vec<Arc<dyn JobSourceAdapter>>,
    cache: Arc<dyn SearchCacheStore>,
    translator: SkillTranslator,
    filter: PoolFilter,
    config: AggregatorConfig,
}

impl MultiSourceAggregator {
    pub fn new(
        adapters: impl IntoIterator<Item = Arc<dyn JobSourceAdapter>>,
        cache: Arc<dyn SearchCacheStore>,
    ) -> CoreResult<Self> {
        Self::with_config(
            adapters,
            cache,
            SkillTranslator::military(),
            AggregatorConfig::default(),
        )
    }

    pub fn with_config(
        adapters: impl IntoIterator<Item = Arc<dyn JobSourceAdapter>>,
        cache: Arc<dyn SearchCacheStore>,
        translator: SkillTranslator,
        config: AggregatorConfig,
    ) -> CoreResult<Self> {
        let mut registered: Vec<Arc<dyn JobSourceAdapter>> = Vec::new();
        let mut seen = HashSet::new();
        for adapter in adapters {
            let source = adapter.descriptor().id;
            if !seen.insert(source) {
                return Err(CoreError {
                    provider: Some(source),
                    kind: CoreErrorKind::InvalidInput,
                    message: format!("duplicate adapter registration for source '{source}'"),
                });
            }
            registered.push(adapter);
        }

        if registered.is_empty() {
            return Err(CoreError::configuration(
                "at least one job source must be registered",
            ));
        }

        let filter = PoolFilter::new(LocationMatcher::new(config.location), config.skill_match);
        Ok(Self {
            adapters: fallback_chain(&registered),
            cache,
            translator,
            filter,
            config,
        })
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn translator(&self) -> &SkillTranslator {
        &self.translator
    }

    /// Registered sources in the order the walk visits them.
    pub fn sources(&self) -> Vec<SourceDescriptor> {
        self.adapters
            .iter()
            .map(|adapter| adapter.descriptor().clone())
            .collect()
    }

    pub fn has_source(&self, source: SourceId) -> bool {
        self.adapters
            .iter()
            .any(|adapter| adapter.descriptor().id == source)
    }

    /// Drops the cached result for `query`, if any.
    pub fn invalidate(&self, query: &JobQuery) -> bool {
        self.cache.invalidate(&query.fingerprint())
    }

    /// One page of the filtered pool for `query`.
    pub async fn search(&self, query: &JobQuery, options: SearchOptions) -> CoreResult<SearchResult> {
        let pool = self.search_pool(query, options).await?;
        Ok(pool.page(query.page, self.config.page_size))
    }

    /// The whole filtered pool for `query`, cached under its page-less
    /// fingerprint. `query.page` is ignored.
    pub async fn search_pool(
        &self,
        query: &JobQuery,
        options: SearchOptions,
    ) -> CoreResult<SearchResult> {
        query.validate()?;
        let fingerprint = query.fingerprint();

        if !options.force_refresh {
            if let Some(cached) = self.cache.get(&fingerprint) {
                tracing::debug!(fingerprint = %fingerprint, "search cache hit");
                return Ok(cached);
            }
            tracing::debug!(fingerprint = %fingerprint, "search cache miss");
        }

        let skill_terms = self.translator.keyword_terms(&query.skills);
        let keywords = self
            .translator
            .keyword_expression(&query.keywords, &query.skills);
        let request = SourceRequest::new(query.clone(), keywords, 1, self.config.pool_size)
            .with_skill_terms(skill_terms);

        let walk = self.walk(&request, &fingerprint).await?;
        let pooled = walk.pool.len();
        let filtered = self
            .filter
            .apply(walk.pool, query, &request.skill_vocabulary());

        let result = SearchResult::pooled(filtered.postings, walk.sources);

        tracing::info!(
            fingerprint = %fingerprint,
            sources = ?result.sources,
            pooled,
            total_count = result.total_count,
            location_mode = ?filtered.location_mode,
            "search completed"
        );

        self.cache.set(&fingerprint, result.clone());
        Ok(result)
    }

    async fn walk(&self, request: &SourceRequest, fingerprint: &str) -> CoreResult<WalkOutcome> {
        let mut pool: Vec<Posting> = Vec::new();
        let mut sources = Vec::new();
        let mut dedup_keys = HashSet::new();
        let mut failures = 0usize;
        let mut last_failure: Option<CoreError> = None;

        for adapter in &self.adapters {
            let source = adapter.descriptor().id;
            match self.call_adapter(adapter.clone(), request.clone()).await {
                Ok(page) if page.postings.is_empty() => {
                    tracing::debug!(source = %source, fingerprint = %fingerprint, "source returned no postings");
                }
                Ok(page) => {
                    let before = pool.len();
                    match self.config.policy {
                        FallbackPolicy::FirstSuccess => pool.extend(page.postings),
                        FallbackPolicy::MergeAll => pool.extend(
                            page.postings
                                .into_iter()
                                .filter(|posting| dedup_keys.insert(posting.dedup_key())),
                        ),
                    }
                    if pool.len() > before {
                        sources.push(source);
                    }
                    if self.config.policy == FallbackPolicy::FirstSuccess {
                        break;
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        source = %source,
                        fingerprint = %fingerprint,
                        kind = ?error.kind,
                        message = %error.message,
                        "job source failed; falling back"
                    );
                    failures += 1;
                    last_failure = Some(error);
                }
            }
        }

        if failures == self.adapters.len()
            && let Some(last) = last_failure
        {
            let cause = last.cause().unwrap_or(ProviderCause::HttpError);
            tracing::error!(
                fingerprint = %fingerprint,
                sources = failures,
                cause = ?cause,
                "every job source failed"
            );
            return Err(CoreError {
                provider: last.provider,
                kind: CoreErrorKind::SourcesExhausted(cause),
                message: format!("all {failures} job sources failed; last error: {}", last.message),
            });
        }

        Ok(WalkOutcome { pool, sources })
    }

    /// Runs one blocking adapter call under the per-source timeout. A call
    /// that overruns keeps running on the blocking pool; its result is
    /// dropped.
    async fn call_adapter(
        &self,
        adapter: Arc<dyn JobSourceAdapter>,
        request: SourceRequest,
    ) -> CoreResult<SourcePage> {
        let source = adapter.descriptor().id;
        let call = tokio::task::spawn_blocking(move || adapter.search(&request));

        match tokio::time::timeout(self.config.source_timeout, call).await {
            Ok(Ok(result)) => result.map_err(|error| attribute_error(error, source)),
            Ok(Err(join_error)) => Err(attribute_error(
                CoreError::internal(format!("job source task failed: {join_error}")),
                source,
            )),
            Err(_) => Err(CoreError::provider(
                source,
                ProviderCause::Timeout,
                format!(
                    "no response within {}ms",
                    self.config.source_timeout.as_millis()
                ),
            )),
        }
    }
}

fn attribute_error(error: CoreError, source: SourceId) -> CoreError {
    CoreError {
        provider: error.provider.or(Some(source)),
        ..error
    }
}
