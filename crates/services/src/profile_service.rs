use std::sync::Arc;

use tracing::warn;
use wordbottle_core::model::{UserId, UserProfile};

use crate::error::ProfileError;
use crate::sources::ProfileSource;

/// What the Welcome screen shows before a session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeView {
    pub profile: UserProfile,
    /// Sessions started from this screen award no coins.
    pub practice_mode: bool,
}

#[derive(Clone)]
pub struct ProfileService {
    source: Arc<dyn ProfileSource>,
}

impl ProfileService {
    #[must_use]
    pub fn new(source: Arc<dyn ProfileSource>) -> Self {
        Self { source }
    }

    /// Load the user's stats and derive the session mode from their tries.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` if the profile cannot be fetched.
    pub async fn load_welcome(&self, user: UserId) -> Result<WelcomeView, ProfileError> {
        let profile = self.source.fetch_profile(user).await.map_err(|err| {
            warn!(%user, error = %err, "failed to load user information");
            err
        })?;
        let practice_mode = profile.is_practice();
        Ok(WelcomeView {
            profile,
            practice_mode,
        })
    }
}
