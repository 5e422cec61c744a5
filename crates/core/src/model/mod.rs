mod ids;
mod preferences;
mod profile;
mod question;
mod session;

pub use ids::{OptionId, ParseIdError, QuestionId, UserId};

pub use preferences::{DIRECTION_SWAP_KEY, Preferences, SOUND_KEY};
pub use profile::UserProfile;
pub use question::{AnswerOption, Question, QuestionError};
pub use session::{FinalResult, Phase, TimerRules};
