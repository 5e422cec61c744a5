use thiserror::Error;

use crate::model::UserId;

/// Identity used by the demo build when the host injects no user.
pub const DEMO_USER_ID: UserId = UserId::new(822_245_102);

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdentityError {
    #[error("no user identity was provided by the host")]
    Unauthenticated,
}

/// What to do when the host does not provide a user identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityPolicy {
    /// Refuse to start without a host identity.
    #[default]
    Require,
    /// Play as the given identity instead.
    Fallback(UserId),
}

impl IdentityPolicy {
    #[must_use]
    pub fn demo() -> Self {
        Self::Fallback(DEMO_USER_ID)
    }

    /// Resolve the user to play as.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Unauthenticated` when no identity was injected and
    /// the policy is `Require`.
    pub fn resolve(self, injected: Option<UserId>) -> Result<UserId, IdentityError> {
        match (injected, self) {
            (Some(user), _) => Ok(user),
            (None, IdentityPolicy::Fallback(user)) => Ok(user),
            (None, IdentityPolicy::Require) => Err(IdentityError::Unauthenticated),
        }
    }
}
