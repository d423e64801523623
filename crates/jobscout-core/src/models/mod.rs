pub mod error;
pub mod posting;
pub mod profile;
pub mod query;
pub mod search;
pub mod source;

pub use error::{CoreError, CoreErrorKind, CoreResult, ProviderCause};
pub use posting::Posting;
pub use profile::CandidateProfile;
pub use query::{FINGERPRINT_DELIMITER, JobQuery, SearchOptions};
pub use search::SearchResult;
pub use source::{SourceDescriptor, SourceId, SourceTier};
