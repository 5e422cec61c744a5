use serde::{Deserialize, Serialize};

/// Screen a quiz session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Welcome,
    Running,
    Finished,
}

impl Phase {
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Phase::Running)
    }
}

/// Countdown configuration for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRules {
    /// Seconds on the clock when a session starts.
    pub initial_secs: u32,
    /// Seconds added for a correct answer.
    pub correct_bonus_secs: u32,
    /// Seconds removed for a wrong answer, floored at zero.
    pub wrong_penalty_secs: u32,
}

impl Default for TimerRules {
    fn default() -> Self {
        Self {
            initial_secs: 20,
            correct_bonus_secs: 2,
            wrong_penalty_secs: 3,
        }
    }
}

impl TimerRules {
    #[must_use]
    pub fn with_initial_secs(mut self, secs: u32) -> Self {
        self.initial_secs = secs;
        self
    }

    /// Clock value after an answer with the given correctness.
    #[must_use]
    pub fn apply(&self, remaining: u32, correct: bool) -> u32 {
        if correct {
            remaining.saturating_add(self.correct_bonus_secs)
        } else {
            remaining.saturating_sub(self.wrong_penalty_secs)
        }
    }
}

/// What the Result screen shows once a session is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResult {
    pub score: u32,
    pub answered_count: u32,
    pub final_score: u32,
    pub practice_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_answer_adds_bonus() {
        let rules = TimerRules::default();
        assert_eq!(rules.apply(10, true), 12);
    }

    #[test]
    fn wrong_answer_penalty_floors_at_zero() {
        let rules = TimerRules::default();
        assert_eq!(rules.apply(10, false), 7);
        assert_eq!(rules.apply(2, false), 0);
        assert_eq!(rules.apply(0, false), 0);
    }
}
