//! Final-score policies applied on the Result screen.
//!
//! Earlier releases disagreed on how raw correct answers turn into coins, so the
//! rule is a pluggable policy rather than a constant.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Converts a count of correct answers into the score shown and reported.
pub trait ScoringPolicy: Send + Sync {
    fn final_score(&self, correct: u32) -> u32;
}

impl<F> ScoringPolicy for F
where
    F: Fn(u32) -> u32 + Send + Sync,
{
    fn final_score(&self, correct: u32) -> u32 {
        self(correct)
    }
}

/// Built-in scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringRule {
    /// One point per correct answer.
    Plain,
    /// Two points per correct answer.
    Doubled,
    /// One point per correct answer plus one bonus point per five.
    #[default]
    FifthBonus,
}

impl ScoringPolicy for ScoringRule {
    fn final_score(&self, correct: u32) -> u32 {
        match self {
            ScoringRule::Plain => correct,
            ScoringRule::Doubled => correct.saturating_mul(2),
            ScoringRule::FifthBonus => correct.saturating_add(correct / 5),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown scoring rule: {0} (expected plain, doubled or fifth-bonus)")]
pub struct ScoringRuleError(pub String);

impl FromStr for ScoringRule {
    type Err = ScoringRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "doubled" | "double" => Ok(Self::Doubled),
            "fifth-bonus" | "fifth_bonus" | "bonus" => Ok(Self::FifthBonus),
            _ => Err(ScoringRuleError(s.to_string())),
        }
    }
}

impl fmt::Display for ScoringRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScoringRule::Plain => "plain",
            ScoringRule::Doubled => "doubled",
            ScoringRule::FifthBonus => "fifth-bonus",
        };
        f.write_str(name)
    }
}
