use std::sync::Arc;

use tokio::sync::Mutex;

use crate::models::{
    CandidateProfile, CoreError, CoreResult, JobQuery, SearchOptions, SearchResult,
};
use crate::orchestration::MultiSourceAggregator;
use crate::scoring::RecommendationEngine;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The result is now the visible one.
    Committed(SearchResult),
    /// A newer search was issued while this one was in flight.
    Stale { sequence: u64 },
}

impl SessionOutcome {
    pub fn committed(&self) -> Option<&SearchResult> {
        match self {
            Self::Committed(result) => Some(result),
            Self::Stale { .. } => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }
}

#[derive(Default)]
struct SessionState {
    sequence: u64,
    last_query: Option<JobQuery>,
    current: Option<SearchResult>,
    /// Fingerprint of the query `current` answers.
    committed_fingerprint: Option<String>,
    profile: Option<CandidateProfile>,
}

/// One user's view over the aggregator: the visible page, the query that
/// produced it and the sequence token guarding it against late results.
///
/// The state lock is never held while a search is in flight, so searches
/// overlap freely and only the most recently issued one commits.
pub struct SearchSession {
    aggregator: Arc<MultiSourceAggregator>,
    recommender: RecommendationEngine,
    state: Mutex<SessionState>,
}

impl SearchSession {
    pub fn new(aggregator: Arc<MultiSourceAggregator>) -> Self {
        Self::with_recommender(aggregator, RecommendationEngine::default())
    }

    pub fn with_recommender(
        aggregator: Arc<MultiSourceAggregator>,
        recommender: RecommendationEngine,
    ) -> Self {
        Self {
            aggregator,
            recommender,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Profile used to rank every later commit. Does not re-rank the
    /// visible result.
    pub async fn set_profile(&self, profile: Option<CandidateProfile>) {
        self.state.lock().await.profile = profile;
    }

    pub async fn current(&self) -> Option<SearchResult> {
        self.state.lock().await.current.clone()
    }

    pub async fn last_query(&self) -> Option<JobQuery> {
        self.state.lock().await.last_query.clone()
    }

    pub async fn sequence(&self) -> u64 {
        self.state.lock().await.sequence
    }

    pub async fn search(&self, query: JobQuery, options: SearchOptions) -> CoreResult<SessionOutcome> {
        query.validate()?;

        let sequence = {
            let mut state = self.state.lock().await;
            state.sequence += 1;
            state.last_query = Some(query.clone());
            state.sequence
        };

        let pool = self.search_with_retry(&query, options).await?;

        let mut state = self.state.lock().await;
        if state.sequence != sequence {
            tracing::debug!(
                sequence,
                latest = state.sequence,
                "discarding stale search result"
            );
            return Ok(SessionOutcome::Stale { sequence });
        }

        let pool = match &state.profile {
            Some(profile) => self.recommender.rank_result(&pool, profile),
            None => pool,
        };
        let result = pool.page(query.page, self.aggregator.config().page_size);
        state.current = Some(result.clone());
        state.committed_fingerprint = Some(query.fingerprint());
        Ok(SessionOutcome::Committed(result))
    }

    pub async fn next_page(&self) -> CoreResult<SessionOutcome> {
        let page = self.visible_page().await?.saturating_add(1);
        self.goto_page(page).await
    }

    pub async fn previous_page(&self) -> CoreResult<SessionOutcome> {
        let page = self.visible_page().await?.saturating_sub(1);
        self.goto_page(page).await
    }

    /// Re-issues the last query for `page`, clamped to `1..=total_pages`
    /// when the visible result answers that same query.
    pub async fn goto_page(&self, page: u32) -> CoreResult<SessionOutcome> {
        let query = {
            let state = self.state.lock().await;
            let Some(query) = state.last_query.clone() else {
                return Err(CoreError::invalid_input("no search has been issued yet"));
            };
            let fingerprint = query.fingerprint();
            let known_pages = state
                .current
                .as_ref()
                .filter(|_| state.committed_fingerprint.as_deref() == Some(fingerprint.as_str()))
                .map(|result| result.total_pages)
                .filter(|pages| *pages > 0);
            let page = match known_pages {
                Some(pages) => page.clamp(1, pages),
                None => page.max(1),
            };
            query.with_page(page)
        };

        self.search(query, SearchOptions::default()).await
    }

    async fn visible_page(&self) -> CoreResult<u32> {
        let state = self.state.lock().await;
        state
            .last_query
            .as_ref()
            .map(|query| query.page)
            .ok_or_else(|| CoreError::invalid_input("no search has been issued yet"))
    }

    /// The whole filtered pool, so ranking sees every posting before the
    /// page is sliced. One retry when every source failed; a second
    /// exhaustion becomes an empty result carrying the error.
    async fn search_with_retry(
        &self,
        query: &JobQuery,
        options: SearchOptions,
    ) -> CoreResult<SearchResult> {
        match self.aggregator.search_pool(query, options).await {
            Err(error) if error.is_exhausted() => {
                tracing::warn!(
                    fingerprint = %query.fingerprint(),
                    message = %error.message,
                    "all job sources failed; retrying once"
                );
            }
            other => return other,
        }

        match self.aggregator.search_pool(query, options).await {
            Err(error) if error.is_exhausted() => Ok(SearchResult::failed(
                query.page,
                self.aggregator.config().page_size,
                error,
            )),
            other => other,
        }
    }
}
