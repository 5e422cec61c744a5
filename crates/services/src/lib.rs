#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod error;
pub mod notice;
pub mod preferences_service;
pub mod profile_service;
pub mod sessions;
pub mod sources;

pub use wordbottle_core::{ScoringPolicy, ScoringRule};

pub use api::{ApiConfig, HttpBackend};
pub use app_services::AppServices;
pub use error::{
    ApiConfigError, AppServicesError, PreferencesError, ProfileError, QuestionSourceError,
    ReportError, SessionError, StartError,
};
pub use notice::{NOTICE_DISMISS_AFTER, Notice};
pub use preferences_service::PreferencesService;
pub use profile_service::{ProfileService, WelcomeView};
pub use sessions::{
    AnswerFeedback, FinishedSession, QuizLoopService, QuizSession, SessionOptions,
    SessionProgress, TickOutcome,
};
pub use sources::{ProfileSource, QuestionOptions, QuestionSource, ScoreReporter};
