use std::error::Error;
use std::io;
use std::time::Duration;

use crate::adapters::source::AdapterResult;
use crate::models::{CoreError, ProviderCause, SourceId};

const USER_AGENT: &str = concat!("jobscout/", env!("CARGO_PKG_VERSION"));

pub(crate) fn http_agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Performs the request and returns a non-empty body, mapping every failure
/// onto a provider cause.
pub(crate) fn fetch_body(source: SourceId, request: ureq::Request) -> AdapterResult<String> {
    let response = match request.call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            return Err(CoreError::provider(
                source,
                status_cause(code),
                format!("provider responded with HTTP {code} {}", response.status_text()),
            ));
        }
        Err(ureq::Error::Transport(transport)) => {
            return Err(CoreError::provider(
                source,
                failure_cause(&transport),
                format!("provider request failed: {transport}"),
            ));
        }
    };

    let body = response.into_string().map_err(|error| {
        CoreError::provider(
            source,
            failure_cause(&error),
            format!("failed to read provider body: {error}"),
        )
    })?;

    if body.trim().is_empty() {
        return Err(CoreError::provider(
            source,
            ProviderCause::EmptyResponse,
            "provider returned an empty body",
        ));
    }

    Ok(body)
}

pub(crate) fn status_cause(code: u16) -> ProviderCause {
    match code {
        429 => ProviderCause::RateLimited,
        _ => ProviderCause::HttpError,
    }
}

fn failure_cause(error: &(dyn Error + 'static)) -> ProviderCause {
    if is_timeout(error) {
        ProviderCause::Timeout
    } else {
        ProviderCause::HttpError
    }
}

/// Walks the error chain looking for an I/O timeout. `io::Error` hides its
/// payload from `source()`, so custom payloads are followed explicitly.
fn is_timeout(error: &(dyn Error + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(error) = current {
        if let Some(io_error) = error.downcast_ref::<io::Error>() {
            if matches!(
                io_error.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ) {
                return true;
            }
            if let Some(inner) = io_error.get_ref() {
                current = Some(inner as &(dyn Error + 'static));
                continue;
            }
        }
        current = error.source();
    }
    false
}

pub(crate) fn parse_error(source: SourceId, message: impl Into<String>) -> CoreError {
    CoreError::provider(source, ProviderCause::ParseFailure, message)
}
