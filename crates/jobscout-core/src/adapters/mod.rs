pub mod adzuna;
pub mod adzuna_http;
pub mod employer_directory;
pub(crate) mod http_utils;
pub mod job_bank;
pub mod job_bank_http;
pub mod source;
pub mod synthetic;

pub use adzuna::{AdzunaAdapter, AdzunaSearchRequest, AdzunaSource, adzuna_search_request};
pub use adzuna_http::{AdzunaCredentials, DEFAULT_ADZUNA_URL, HttpAdzunaSource};
pub use employer_directory::EmployerDirectoryAdapter;
pub use job_bank::{JobBankAdapter, JobBankSearchRequest, JobBankSource, job_bank_search_request};
pub use job_bank_http::{DEFAULT_JOB_BANK_URL, HttpJobBankSource};
pub use source::{AdapterResult, JobSourceAdapter, SourcePage, SourceRequest};
pub use synthetic::{DEFAULT_SYNTHETIC_COUNT, SyntheticAdapter};
