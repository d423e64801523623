use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jobscout_core::adapters::{AdapterResult, JobSourceAdapter, SourcePage, SourceRequest};
use jobscout_core::cache::{InMemorySearchCache, SearchCacheStore};
use jobscout_core::matching::SkillTranslator;
use jobscout_core::models::{
    CoreError, CoreErrorKind, JobQuery, Posting, ProviderCause, SearchOptions, SourceDescriptor,
    SourceId,
};
use jobscout_core::orchestration::{AggregatorConfig, FallbackPolicy, MultiSourceAggregator};
use jobscout_core::registry;

enum Reply {
    Postings(Vec<Posting>),
    Fail(ProviderCause),
    Slow(Duration, Vec<Posting>),
}

struct StubAdapter {
    descriptor: SourceDescriptor,
    reply: Reply,
    calls: AtomicUsize,
    last_request: Mutex<Option<SourceRequest>>,
}

impl StubAdapter {
    fn new(source: SourceId, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            descriptor: registry::source(source)
                .expect("built-in descriptor")
                .clone(),
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl JobSourceAdapter for StubAdapter {
    fn descriptor(&self) -> &SourceDescriptor {
        &self.descriptor
    }

    fn search(&self, request: &SourceRequest) -> AdapterResult<SourcePage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &self.reply {
            Reply::Postings(postings) => {
                Ok(SourcePage::new(postings.clone(), postings.len(), request.per_page))
            }
            Reply::Fail(cause) => Err(CoreError::provider(
                self.descriptor.id,
                *cause,
                "stubbed failure",
            )),
            Reply::Slow(delay, postings) => {
                std::thread::sleep(*delay);
                Ok(SourcePage::new(postings.clone(), postings.len(), request.per_page))
            }
        }
    }
}

fn posting(source: SourceId, id: &str, title: &str, location: &str) -> Posting {
    Posting::new(source, id, title, "Acme Logistics", location)
}

fn postings(source: SourceId, count: usize) -> Vec<Posting> {
    (0..count)
        .map(|index| posting(source, &format!("{source}-{index}"), &format!("Role {index}"), "Ottawa, ON"))
        .collect()
}

fn aggregator(
    adapters: Vec<Arc<StubAdapter>>,
    config: AggregatorConfig,
) -> MultiSourceAggregator {
    let adapters = adapters
        .into_iter()
        .map(|adapter| adapter as Arc<dyn JobSourceAdapter>);
    let cache: Arc<dyn SearchCacheStore> = Arc::new(InMemorySearchCache::default());
    MultiSourceAggregator::with_config(adapters, cache, SkillTranslator::military(), config)
        .expect("aggregator construction should succeed")
}

#[tokio::test]
async fn empty_first_source_falls_through_and_first_success_stops_the_walk() {
    let job_bank = StubAdapter::new(SourceId::JobBank, Reply::Postings(Vec::new()));
    let adzuna = StubAdapter::new(SourceId::Adzuna, Reply::Postings(postings(SourceId::Adzuna, 3)));
    let directory = StubAdapter::new(
        SourceId::EmployerDirectory,
        Reply::Postings(postings(SourceId::EmployerDirectory, 2)),
    );

    let aggregator = aggregator(
        vec![directory.clone(), adzuna.clone(), job_bank.clone()],
        AggregatorConfig::default(),
    );
    let result = aggregator
        .search(&JobQuery::new("clerk"), SearchOptions::default())
        .await
        .expect("search should succeed");

    assert_eq!(result.total_count, 3);
    assert_eq!(result.sources, vec![SourceId::Adzuna]);
    assert!(result.postings.iter().all(|posting| posting.source == SourceId::Adzuna));
    assert_eq!(job_bank.calls(), 1);
    assert_eq!(adzuna.calls(), 1);
    assert_eq!(directory.calls(), 0);
}

#[tokio::test]
async fn provider_failures_are_skipped() {
    let job_bank = StubAdapter::new(SourceId::JobBank, Reply::Fail(ProviderCause::RateLimited));
    let directory = StubAdapter::new(
        SourceId::EmployerDirectory,
        Reply::Postings(postings(SourceId::EmployerDirectory, 2)),
    );

    let aggregator = aggregator(vec![job_bank.clone(), directory.clone()], AggregatorConfig::default());
    let result = aggregator
        .search(&JobQuery::new("clerk"), SearchOptions::default())
        .await
        .expect("directory should answer");

    assert_eq!(result.sources, vec![SourceId::EmployerDirectory]);
    assert_eq!(result.total_count, 2);
    assert!(result.error.is_none());
    assert_eq!(job_bank.calls(), 1);
}

#[tokio::test]
async fn slow_source_times_out_and_the_walk_continues() {
    let job_bank = StubAdapter::new(
        SourceId::JobBank,
        Reply::Slow(Duration::from_millis(400), postings(SourceId::JobBank, 4)),
    );
    let synthetic = StubAdapter::new(
        SourceId::Synthetic,
        Reply::Postings(postings(SourceId::Synthetic, 1)),
    );

    let config = AggregatorConfig {
        source_timeout: Duration::from_millis(50),
        ..AggregatorConfig::default()
    };
    let aggregator = aggregator(vec![job_bank.clone(), synthetic.clone()], config);
    let result = aggregator
        .search(&JobQuery::new("clerk"), SearchOptions::default())
        .await
        .expect("synthetic should answer");

    assert_eq!(result.sources, vec![SourceId::Synthetic]);
    assert_eq!(result.total_count, 1);
    assert_eq!(job_bank.calls(), 1);
}

#[tokio::test]
async fn all_sources_failing_reports_the_last_cause_and_is_not_cached() {
    let job_bank = StubAdapter::new(SourceId::JobBank, Reply::Fail(ProviderCause::HttpError));
    let synthetic = StubAdapter::new(SourceId::Synthetic, Reply::Fail(ProviderCause::EmptyResponse));

    let aggregator = aggregator(vec![synthetic.clone(), job_bank.clone()], AggregatorConfig::default());
    let query = JobQuery::new("clerk");

    let error = aggregator
        .search(&query, SearchOptions::default())
        .await
        .expect_err("every source failed");
    assert_eq!(
        error.kind,
        CoreErrorKind::SourcesExhausted(ProviderCause::EmptyResponse)
    );
    assert_eq!(error.provider, Some(SourceId::Synthetic));

    aggregator
        .search(&query, SearchOptions::default())
        .await
        .expect_err("still failing");
    assert_eq!(job_bank.calls(), 2);
    assert_eq!(synthetic.calls(), 2);
}

#[tokio::test]
async fn merge_all_calls_every_source_and_drops_duplicates() {
    let job_bank = StubAdapter::new(
        SourceId::JobBank,
        Reply::Postings(vec![
            posting(SourceId::JobBank, "jb-1", "Supply Technician", "Ottawa, ON"),
            posting(SourceId::JobBank, "jb-2", "Dispatcher", "Ottawa, ON"),
        ]),
    );
    let adzuna = StubAdapter::new(
        SourceId::Adzuna,
        Reply::Postings(vec![
            posting(SourceId::Adzuna, "az-1", "supply technician ", "Ottawa, ON"),
            posting(SourceId::Adzuna, "az-2", "Fleet Coordinator", "Ottawa, ON"),
        ]),
    );
    let synthetic = StubAdapter::new(SourceId::Synthetic, Reply::Postings(Vec::new()));

    let config = AggregatorConfig {
        policy: FallbackPolicy::MergeAll,
        ..AggregatorConfig::default()
    };
    let aggregator = aggregator(vec![job_bank.clone(), adzuna.clone(), synthetic.clone()], config);
    let result = aggregator
        .search(&JobQuery::new("clerk"), SearchOptions::default())
        .await
        .expect("merge should succeed");

    let ids: Vec<&str> = result.postings.iter().map(|posting| posting.id.as_str()).collect();
    assert_eq!(ids, vec!["jb-1", "jb-2", "az-2"]);
    assert_eq!(result.provenance[&SourceId::JobBank], 2);
    assert_eq!(result.provenance[&SourceId::Adzuna], 1);
    assert_eq!(result.sources, vec![SourceId::JobBank, SourceId::Adzuna]);
    assert_eq!(synthetic.calls(), 1);
}

#[tokio::test]
async fn totals_and_pages_come_from_the_filtered_pool() {
    let mut pool = Vec::new();
    for index in 0..45 {
        let location = if index % 3 == 2 { "Regina, SK" } else { "Ottawa, ON" };
        pool.push(posting(
            SourceId::JobBank,
            &format!("jb-{index}"),
            &format!("Role {index}"),
            location,
        ));
    }
    let job_bank = StubAdapter::new(SourceId::JobBank, Reply::Postings(pool));

    let aggregator = aggregator(vec![job_bank], AggregatorConfig::default());
    let result = aggregator
        .search(
            &JobQuery::new("clerk").with_location("Ottawa").with_page(2),
            SearchOptions::default(),
        )
        .await
        .expect("search should succeed");

    assert_eq!(result.total_count, 30);
    assert_eq!(result.total_pages, 2);
    assert_eq!(result.current_page, 2);
    assert_eq!(result.postings.len(), 10);
    assert!(result.postings.iter().all(|posting| posting.location == "Ottawa, ON"));
}

#[tokio::test]
async fn skill_tags_reach_sources_as_keyword_terms() {
    let mut tagged = posting(SourceId::JobBank, "jb-1", "Stores Clerk", "Ottawa, ON");
    tagged.required_skills = vec!["Inventory management".to_string()];
    let untagged = posting(SourceId::JobBank, "jb-2", "Cashier", "Ottawa, ON");
    let job_bank = StubAdapter::new(SourceId::JobBank, Reply::Postings(vec![tagged, untagged]));

    let aggregator = aggregator(vec![job_bank.clone()], AggregatorConfig::default());
    let query = JobQuery::new("officer").with_skills(["supply-chain", "basket weaving"]);
    let result = aggregator
        .search(&query, SearchOptions::default())
        .await
        .expect("search should succeed");

    let request = job_bank
        .last_request
        .lock()
        .unwrap()
        .clone()
        .expect("source was called");
    assert_eq!(
        request.keywords,
        "officer supply chain logistics inventory basket weaving"
    );
    assert_eq!(request.page, 1);

    assert_eq!(result.total_count, 1);
    assert_eq!(result.postings[0].id, "jb-1");
    assert_eq!(
        result.postings[0].matching_skills,
        vec!["Inventory management".to_string()]
    );
}
