//! Capabilities the quiz consumes from the outside world.

use async_trait::async_trait;
use wordbottle_core::model::{Question, UserId, UserProfile};

use crate::error::{ProfileError, QuestionSourceError, ReportError};

/// Options forwarded to the question backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestionOptions {
    /// Ask for questions in the reverse language direction.
    pub direction_swap: bool,
}

#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the question pool for a user.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::RateLimited` when the user's daily limit is
    /// used up, and other variants for infrastructure failures.
    async fn fetch_questions(
        &self,
        user: UserId,
        options: QuestionOptions,
    ) -> Result<Vec<Question>, QuestionSourceError>;
}

#[async_trait]
pub trait ScoreReporter: Send + Sync {
    /// Credit `amount` coins to the user.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` when the backend rejects or never receives the report.
    async fn report_score(&self, user: UserId, amount: u32) -> Result<(), ReportError>;
}

#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch Welcome-screen stats for a user.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::NotFound` for unknown users.
    async fn fetch_profile(&self, user: UserId) -> Result<UserProfile, ProfileError>;
}
