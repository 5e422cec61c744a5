#![forbid(unsafe_code)]

pub mod identity;
pub mod model;
pub mod scoring;

pub use identity::{DEMO_USER_ID, IdentityError, IdentityPolicy};
pub use scoring::{ScoringPolicy, ScoringRule};
