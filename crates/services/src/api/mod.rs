//! HTTP client for the WordBottle backend.

mod dto;

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::warn;
use url::Url;
use wordbottle_core::model::{Question, UserId, UserProfile};

use crate::error::{ApiConfigError, ProfileError, QuestionSourceError, ReportError};
use crate::sources::{ProfileSource, QuestionOptions, QuestionSource, ScoreReporter};
use dto::{AddCoinRequest, ApiQuestion, ApiUserResponse};

pub const DEFAULT_QUIZ_BASE_URL: &str = "https://api.octava-edu.uz/api";
pub const DEFAULT_PROFILE_BASE_URL: &str = "https://api.pravaol.uz/api";

/// Upper bound on a single backend round trip.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Non-standard status the quiz backend uses for "daily limit reached".
pub const RATE_LIMITED_STATUS: u16 = 450;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    quiz_base_url: String,
    profile_base_url: String,
}

impl ApiConfig {
    /// Validate and normalize the two backend base URLs.
    ///
    /// # Errors
    ///
    /// Returns `ApiConfigError::InvalidBaseUrl` if either URL does not parse.
    pub fn new(
        quiz_base_url: impl Into<String>,
        profile_base_url: impl Into<String>,
    ) -> Result<Self, ApiConfigError> {
        Ok(Self {
            quiz_base_url: normalize_base_url("quiz", quiz_base_url.into())?,
            profile_base_url: normalize_base_url("profile", profile_base_url.into())?,
        })
    }

    /// Read `WORDBOTTLE_API_URL` / `WORDBOTTLE_PROFILE_API_URL`, falling back to
    /// the production endpoints.
    ///
    /// # Errors
    ///
    /// Returns `ApiConfigError` if an override is not a valid URL.
    pub fn from_env() -> Result<Self, ApiConfigError> {
        let quiz =
            env::var("WORDBOTTLE_API_URL").unwrap_or_else(|_| DEFAULT_QUIZ_BASE_URL.into());
        let profile = env::var("WORDBOTTLE_PROFILE_API_URL")
            .unwrap_or_else(|_| DEFAULT_PROFILE_BASE_URL.into());
        Self::new(quiz, profile)
    }

    fn questions_url(&self, user: UserId, options: QuestionOptions) -> String {
        let mut url = format!("{}/quiz/{user}", self.quiz_base_url);
        if options.direction_swap {
            url.push_str("?direction=swap");
        }
        url
    }

    fn add_coin_url(&self) -> String {
        format!("{}/user/add-coin", self.quiz_base_url)
    }

    fn user_info_url(&self, user: UserId) -> String {
        format!("{}/user-info/{user}", self.profile_base_url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            quiz_base_url: DEFAULT_QUIZ_BASE_URL.into(),
            profile_base_url: DEFAULT_PROFILE_BASE_URL.into(),
        }
    }
}

fn normalize_base_url(name: &'static str, raw: String) -> Result<String, ApiConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(trimmed.to_string()),
        _ => Err(ApiConfigError::InvalidBaseUrl { name, raw }),
    }
}

fn classify_questions_status(status: StatusCode) -> Result<(), QuestionSourceError> {
    if status.as_u16() == RATE_LIMITED_STATUS {
        return Err(QuestionSourceError::RateLimited);
    }
    if !status.is_success() {
        return Err(QuestionSourceError::Unavailable(status));
    }
    Ok(())
}

fn classify_profile_status(status: StatusCode) -> Result<(), ProfileError> {
    if status == StatusCode::NOT_FOUND {
        return Err(ProfileError::NotFound);
    }
    if !status.is_success() {
        return Err(ProfileError::Unavailable(status));
    }
    Ok(())
}

/// Converts decoded questions, dropping the ones that fail validation.
fn collect_questions(raw: Vec<ApiQuestion>) -> Vec<Question> {
    raw.into_iter()
        .filter_map(|question| match question.into_question() {
            Ok(question) => Some(question),
            Err(err) => {
                warn!(error = %err, "skipping malformed question");
                None
            }
        })
        .collect()
}

/// reqwest-backed implementation of every backend capability.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: ApiConfig,
}

impl HttpBackend {
    /// Build a client whose requests give up after [`REQUEST_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the TLS backend cannot be initialized.
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    /// # Errors
    ///
    /// Returns `reqwest::Error` if the TLS backend cannot be initialized.
    pub fn with_timeout(config: ApiConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl QuestionSource for HttpBackend {
    async fn fetch_questions(
        &self,
        user: UserId,
        options: QuestionOptions,
    ) -> Result<Vec<Question>, QuestionSourceError> {
        let response = self
            .client
            .get(self.config.questions_url(user, options))
            .send()
            .await?;
        classify_questions_status(response.status())?;

        let body = response.text().await?;
        let raw: Vec<ApiQuestion> = serde_json::from_str(&body)
            .map_err(|err| QuestionSourceError::Decode(err.to_string()))?;
        Ok(collect_questions(raw))
    }
}

#[async_trait]
impl ScoreReporter for HttpBackend {
    async fn report_score(&self, user: UserId, amount: u32) -> Result<(), ReportError> {
        let payload = AddCoinRequest {
            user_id: user.value(),
            amount,
        };
        let response = self
            .client
            .post(self.config.add_coin_url())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ReportError::Rejected(response.status()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileSource for HttpBackend {
    async fn fetch_profile(&self, user: UserId) -> Result<UserProfile, ProfileError> {
        let response = self
            .client
            .get(self.config.user_info_url(user))
            .send()
            .await?;
        classify_profile_status(response.status())?;

        let body = response.text().await?;
        let raw: ApiUserResponse =
            serde_json::from_str(&body).map_err(|err| ProfileError::Decode(err.to_string()))?;
        Ok(raw.into_profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_450_means_rate_limited() {
        let status = StatusCode::from_u16(450).unwrap();
        assert!(matches!(
            classify_questions_status(status),
            Err(QuestionSourceError::RateLimited)
        ));
    }

    #[test]
    fn other_failures_are_unavailable() {
        assert!(classify_questions_status(StatusCode::OK).is_ok());
        assert!(matches!(
            classify_questions_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(QuestionSourceError::Unavailable(StatusCode::INTERNAL_SERVER_ERROR))
        ));
    }

    #[test]
    fn profile_404_is_not_found() {
        assert!(matches!(
            classify_profile_status(StatusCode::NOT_FOUND),
            Err(ProfileError::NotFound)
        ));
        assert!(matches!(
            classify_profile_status(StatusCode::BAD_GATEWAY),
            Err(ProfileError::Unavailable(_))
        ));
    }

    #[test]
    fn urls_follow_backend_routes() {
        let config = ApiConfig::new("https://quiz.test/api/", "https://users.test/api").unwrap();
        let user = UserId::new(42);

        assert_eq!(
            config.questions_url(user, QuestionOptions::default()),
            "https://quiz.test/api/quiz/42"
        );
        assert_eq!(
            config.questions_url(
                user,
                QuestionOptions {
                    direction_swap: true
                }
            ),
            "https://quiz.test/api/quiz/42?direction=swap"
        );
        assert_eq!(config.add_coin_url(), "https://quiz.test/api/user/add-coin");
        assert_eq!(config.user_info_url(user), "https://users.test/api/user-info/42");
    }

    #[test]
    fn rejects_non_http_base_urls() {
        let err = ApiConfig::new("not a url", DEFAULT_PROFILE_BASE_URL).unwrap_err();
        assert_eq!(
            err,
            ApiConfigError::InvalidBaseUrl {
                name: "quiz",
                raw: "not a url".into(),
            }
        );
        assert!(ApiConfig::new(DEFAULT_QUIZ_BASE_URL, "ftp://files.test").is_err());
    }

    #[tokio::test]
    async fn unresponsive_backend_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let base = format!("http://{addr}/api");
        let config = ApiConfig::new(base.clone(), base).unwrap();
        let backend = HttpBackend::with_timeout(config, Duration::from_millis(200)).unwrap();

        let err = backend
            .fetch_questions(UserId::new(1), QuestionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, QuestionSourceError::Network(ref e) if e.is_timeout()));
        assert!(crate::error::StartError::from(err).is_retryable());
    }

    #[test]
    fn malformed_questions_are_skipped() {
        let raw: Vec<ApiQuestion> = serde_json::from_str(
            r#"[
                {"id": 1, "word": "", "options": [{"id": 1, "option": "a", "is_correct": true}]},
                {"id": 2, "word": "cat", "options": [{"id": 2, "option": "mushuk", "is_correct": true}]}
            ]"#,
        )
        .unwrap();
        let questions = collect_questions(raw);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt(), "cat");
    }
}
