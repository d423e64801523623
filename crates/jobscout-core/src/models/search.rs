use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{CoreError, Posting, SourceId};

/// One page of an aggregated search. Built fresh per aggregator call and
/// never mutated afterwards; ranking produces a new value.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SearchResult {
    pub postings: Vec<Posting>,
    pub total_count: usize,
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
    /// Filtered postings contributed per source, across all pages.
    pub provenance: BTreeMap<SourceId, usize>,
    /// Sources whose postings made it into the pool, in priority order.
    pub sources: Vec<SourceId>,
    /// Set when every source failed; postings are then empty.
    pub error: Option<CoreError>,
}

impl SearchResult {
    /// Slices `page` out of an already-filtered pool. Totals describe the
    /// pool, not whatever the providers reported before filtering.
    pub fn paginate(
        pool: Vec<Posting>,
        page: u32,
        page_size: u32,
        sources: Vec<SourceId>,
    ) -> Self {
        let page_size = page_size.max(1);
        let page = page.max(1);
        let total_count = pool.len();
        let total_pages = total_count.div_ceil(page_size as usize) as u32;

        let mut provenance = BTreeMap::new();
        for posting in &pool {
            *provenance.entry(posting.source).or_insert(0) += 1;
        }

        let start = (page as usize - 1).saturating_mul(page_size as usize);
        let postings = pool
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();

        Self {
            postings,
            total_count,
            current_page: page,
            total_pages,
            page_size,
            provenance,
            sources,
            error: None,
        }
    }

    /// The whole filtered pool as a single page. This is what the cache
    /// holds; callers slice it with [`SearchResult::page`].
    pub fn pooled(pool: Vec<Posting>, sources: Vec<SourceId>) -> Self {
        let page_size = u32::try_from(pool.len()).unwrap_or(u32::MAX).max(1);
        Self::paginate(pool, 1, page_size, sources)
    }

    /// Re-slices `page` out of this result's postings. Provenance, sources
    /// and any attached error carry over.
    pub fn page(&self, page: u32, page_size: u32) -> Self {
        Self {
            error: self.error.clone(),
            ..Self::paginate(self.postings.clone(), page, page_size, self.sources.clone())
        }
    }

    pub fn empty(page: u32, page_size: u32) -> Self {
        Self::paginate(Vec::new(), page, page_size, Vec::new())
    }

    pub fn failed(page: u32, page_size: u32, error: CoreError) -> Self {
        Self {
            error: Some(error),
            ..Self::empty(page, page_size)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn with_postings(&self, postings: Vec<Posting>) -> Self {
        Self {
            postings,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::ProviderCause;

    use super::*;

    fn pool(count: usize) -> Vec<Posting> {
        (0..count)
            .map(|index| {
                let source = if index % 2 == 0 {
                    SourceId::JobBank
                } else {
                    SourceId::Adzuna
                };
                Posting::new(source, format!("p-{index}"), "Clerk", "Acme", "Ottawa")
            })
            .collect()
    }

    #[test]
    fn paginate_reports_totals_of_the_whole_pool() {
        let result = SearchResult::paginate(pool(45), 2, 20, vec![SourceId::JobBank]);

        assert_eq!(result.total_count, 45);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.current_page, 2);
        assert_eq!(result.postings.len(), 20);
        assert_eq!(result.postings[0].id, "p-20");
        assert_eq!(result.provenance[&SourceId::JobBank], 23);
        assert_eq!(result.provenance[&SourceId::Adzuna], 22);
    }

    #[test]
    fn paginate_past_the_end_is_empty_but_keeps_totals() {
        let result = SearchResult::paginate(pool(5), 4, 20, Vec::new());
        assert!(result.is_empty());
        assert_eq!(result.total_count, 5);
        assert_eq!(result.total_pages, 1);
    }

    #[test]
    fn pooled_result_slices_into_pages() {
        let pooled = SearchResult::pooled(pool(45), vec![SourceId::JobBank, SourceId::Adzuna]);
        assert_eq!(pooled.postings.len(), 45);
        assert_eq!(pooled.total_pages, 1);

        let third = pooled.page(3, 20);
        assert_eq!(third.current_page, 3);
        assert_eq!(third.total_pages, 3);
        assert_eq!(third.total_count, 45);
        assert_eq!(third.postings.len(), 5);
        assert_eq!(third.postings[0].id, "p-40");
        assert_eq!(third.provenance, pooled.provenance);
        assert_eq!(third.sources, pooled.sources);
    }

    #[test]
    fn empty_pool_has_zero_pages() {
        let result = SearchResult::empty(1, 20);
        assert_eq!(result.total_pages, 0);
        assert!(result.provenance.is_empty());
    }

    #[test]
    fn failed_result_carries_error() {
        let error = CoreError::provider(SourceId::Synthetic, ProviderCause::EmptyResponse, "none");
        let result = SearchResult::failed(1, 20, error.clone());
        assert!(result.is_empty());
        assert_eq!(result.error, Some(error));
    }
}
