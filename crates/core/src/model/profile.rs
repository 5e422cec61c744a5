use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

/// Stats shown on the Welcome screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub display_name: String,
    pub level: String,
    pub coin_balance: u64,
    /// Remaining daily tries, when the backend reports them.
    pub remaining_tries: Option<u32>,
}

impl UserProfile {
    /// A user with no tries left plays in practice mode: no coins are awarded.
    ///
    /// An unknown try count is treated as a regular session.
    #[must_use]
    pub fn is_practice(&self) -> bool {
        self.remaining_tries == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(remaining_tries: Option<u32>) -> UserProfile {
        UserProfile {
            user_id: UserId::new(1),
            display_name: "Ali".into(),
            level: "Beginner".into(),
            coin_balance: 40,
            remaining_tries,
        }
    }

    #[test]
    fn practice_only_when_tries_exhausted() {
        assert!(profile(Some(0)).is_practice());
        assert!(!profile(Some(3)).is_practice());
        assert!(!profile(None).is_practice());
    }
}
