use std::time::Duration;

use crate::error::StartError;

/// How long a rate-limit notice stays on screen.
pub const NOTICE_DISMISS_AFTER: Duration = Duration::from_secs(3);

/// A transient, user-facing message shown on the Welcome screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// `None` keeps the notice until the user retries.
    pub dismiss_after: Option<Duration>,
}

impl StartError {
    /// The message to show the player for this failure.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            StartError::RateLimited => Notice {
                message: "Your daily limit is used up!".into(),
                dismiss_after: Some(NOTICE_DISMISS_AFTER),
            },
            StartError::EmptyPool => Notice {
                message: "No questions were loaded. Please try again.".into(),
                dismiss_after: None,
            },
            StartError::Load(_) | StartError::Session(_) => Notice {
                message: "Could not start the test. Please try again.".into(),
                dismiss_after: None,
            },
        }
    }

    /// Whether offering a retry makes sense. A reached limit does not reset by retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, StartError::RateLimited)
    }
}
