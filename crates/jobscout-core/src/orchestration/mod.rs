pub mod aggregator;
pub mod filters;
pub mod priority;
pub mod session;

pub use aggregator::{
    AggregatorConfig, DEFAULT_PAGE_SIZE, DEFAULT_POOL_SIZE, DEFAULT_SOURCE_TIMEOUT,
    FallbackPolicy, MultiSourceAggregator,
};
pub use filters::{FilteredPool, PoolFilter, matches_categories};
pub use priority::fallback_chain;
pub use session::{SearchSession, SessionOutcome};
