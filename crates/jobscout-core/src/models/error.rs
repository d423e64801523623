use serde::Serialize;
use thiserror::Error;

use crate::models::SourceId;

pub type CoreResult<T> = Result<T, CoreError>;

/// Why a single provider call failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderCause {
    Timeout,
    HttpError,
    RateLimited,
    EmptyResponse,
    ParseFailure,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "cause")]
pub enum CoreErrorKind {
    InvalidInput,
    Provider(ProviderCause),
    SourcesExhausted(ProviderCause),
    Configuration,
    Internal,
}

#[derive(Clone, Debug, Eq, PartialEq, Error, Serialize)]
#[error("{kind:?}: {message}")]
pub struct CoreError {
    pub provider: Option<SourceId>,
    pub kind: CoreErrorKind,
    pub message: String,
}

impl CoreError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            provider: None,
            kind: CoreErrorKind::InvalidInput,
            message: message.into(),
        }
    }

    pub fn provider(source: SourceId, cause: ProviderCause, message: impl Into<String>) -> Self {
        Self {
            provider: Some(source),
            kind: CoreErrorKind::Provider(cause),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            provider: None,
            kind: CoreErrorKind::Configuration,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            provider: None,
            kind: CoreErrorKind::Internal,
            message: message.into(),
        }
    }

    /// The provider-level cause, for both single failures and exhaustion.
    pub fn cause(&self) -> Option<ProviderCause> {
        match self.kind {
            CoreErrorKind::Provider(cause) | CoreErrorKind::SourcesExhausted(cause) => Some(cause),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.kind, CoreErrorKind::SourcesExhausted(_))
    }
}
