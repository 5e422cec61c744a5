//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by a `QuestionSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    /// The backend's daily-limit response. Expected, not a fault.
    #[error("daily question limit reached")]
    RateLimited,
    #[error("question service responded with status {0}")]
    Unavailable(reqwest::StatusCode),
    #[error("question payload could not be decoded: {0}")]
    Decode(String),
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

/// Errors emitted by a `ScoreReporter`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("score report rejected with status {0}")]
    Rejected(reqwest::StatusCode),
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

/// Errors emitted by a `ProfileSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("user not found")]
    NotFound,
    #[error("profile service responded with status {0}")]
    Unavailable(reqwest::StatusCode),
    #[error("profile payload could not be decoded: {0}")]
    Decode(String),
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    EmptyPool,
    #[error("session is already running")]
    AlreadyRunning,
    #[error("session has not finished yet")]
    NotFinished,
    #[error("option {index} is out of range for a question with {len} options")]
    InvalidOption { index: usize, len: usize },
}

/// Errors emitted while loading questions and starting a session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StartError {
    #[error("daily question limit reached")]
    RateLimited,
    #[error("questions could not be loaded: {0}")]
    Load(#[source] QuestionSourceError),
    #[error("no questions available")]
    EmptyPool,
    #[error(transparent)]
    Session(SessionError),
}

impl From<QuestionSourceError> for StartError {
    fn from(err: QuestionSourceError) -> Self {
        match err {
            QuestionSourceError::RateLimited => Self::RateLimited,
            other => Self::Load(other),
        }
    }
}

impl From<SessionError> for StartError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::EmptyPool => Self::EmptyPool,
            other => Self::Session(other),
        }
    }
}

/// Errors emitted by `PreferencesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreferencesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

/// Errors emitted while validating API endpoints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiConfigError {
    #[error("invalid base URL for {name}: {raw}")]
    InvalidBaseUrl { name: &'static str, raw: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    ApiConfig(#[from] ApiConfigError),
    #[error("HTTP client could not be built: {0}")]
    Http(#[from] reqwest::Error),
}
