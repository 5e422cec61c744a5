use std::sync::Arc;

use storage::repository::Storage;
use wordbottle_core::ScoringPolicy;
use wordbottle_core::model::TimerRules;

use crate::api::{ApiConfig, HttpBackend};
use crate::error::AppServicesError;
use crate::preferences_service::PreferencesService;
use crate::profile_service::ProfileService;
use crate::sessions::QuizLoopService;

/// Assembles app-facing services over one backend client and one store.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    profiles: Arc<ProfileService>,
    preferences: Arc<PreferencesService>,
}

impl AppServices {
    /// Wire services against the HTTP backend and the given storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Http` if the HTTP client cannot be built.
    pub fn new(
        storage: &Storage,
        api: ApiConfig,
        rules: TimerRules,
        scoring: Arc<dyn ScoringPolicy>,
    ) -> Result<Self, AppServicesError> {
        let backend = Arc::new(HttpBackend::new(api)?);
        let quiz_loop = QuizLoopService::new(backend.clone(), backend.clone())
            .with_rules(rules)
            .with_scoring(scoring);

        Ok(Self {
            quiz_loop: Arc::new(quiz_loop),
            profiles: Arc::new(ProfileService::new(backend)),
            preferences: Arc::new(PreferencesService::new(Arc::clone(&storage.preferences))),
        })
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage or the HTTP client cannot be
    /// initialized.
    pub async fn new_sqlite(
        db_url: &str,
        api: ApiConfig,
        rules: TimerRules,
        scoring: Arc<dyn ScoringPolicy>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::new(&storage, api, rules, scoring)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn profiles(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profiles)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }
}
