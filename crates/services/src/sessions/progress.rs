use wordbottle_core::model::Phase;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub phase: Phase,
    pub total: usize,
    pub answered: u32,
    pub remaining: usize,
    pub score: u32,
    pub time_remaining: u32,
}
