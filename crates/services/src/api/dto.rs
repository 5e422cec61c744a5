//! Wire shapes of the WordBottle backend.

use serde::{Deserialize, Serialize};
use wordbottle_core::model::{
    AnswerOption, OptionId, Question, QuestionError, QuestionId, UserId, UserProfile,
};

#[derive(Debug, Deserialize)]
pub(crate) struct ApiQuestion {
    pub id: u64,
    pub word: String,
    pub options: Vec<ApiOption>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiOption {
    pub id: u64,
    pub option: String,
    pub is_correct: bool,
}

impl ApiQuestion {
    pub(crate) fn into_question(self) -> Result<Question, QuestionError> {
        let options = self
            .options
            .into_iter()
            .map(|opt| AnswerOption::new(OptionId::new(opt.id), opt.option, opt.is_correct))
            .collect();
        Question::new(QuestionId::new(self.id), self.word, options)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiLevel {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiUserResponse {
    pub user_id: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub level: Option<ApiLevel>,
    #[serde(default)]
    pub coin: u64,
    #[serde(default, alias = "remaining_tries", alias = "try_count")]
    pub tries: Option<u32>,
}

impl ApiUserResponse {
    pub(crate) fn into_profile(self) -> UserProfile {
        let display_name = [self.full_name, self.username]
            .into_iter()
            .flatten()
            .map(|name| name.trim().to_string())
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| "User".to_string());

        UserProfile {
            user_id: UserId::new(self.user_id),
            display_name,
            level: self
                .level
                .map_or_else(|| "Beginner".to_string(), |level| level.name),
            coin_balance: self.coin,
            remaining_tries: self.tries,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddCoinRequest {
    pub user_id: u64,
    pub amount: u32,
}
