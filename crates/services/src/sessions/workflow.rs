use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use wordbottle_core::model::{FinalResult, Question, TimerRules, UserId};
use wordbottle_core::{ScoringPolicy, ScoringRule};

use super::service::QuizSession;
use crate::error::{QuestionSourceError, SessionError, StartError};
use crate::sources::{QuestionOptions, QuestionSource, ScoreReporter};

/// Per-playthrough choices made on the Welcome screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub direction_swap: bool,
    /// Practice sessions never award coins.
    pub practice_mode: bool,
}

impl SessionOptions {
    #[must_use]
    pub fn question_options(&self) -> QuestionOptions {
        QuestionOptions {
            direction_swap: self.direction_swap,
        }
    }
}

/// Result of finishing a session.
#[derive(Debug)]
pub struct FinishedSession {
    pub result: FinalResult,
    /// Detached score report, if one was dispatched. Dropping it does not cancel
    /// the report.
    pub report: Option<JoinHandle<()>>,
}

/// Orchestrates question loading, session start, and score reporting.
#[derive(Clone)]
pub struct QuizLoopService {
    questions: Arc<dyn QuestionSource>,
    reporter: Arc<dyn ScoreReporter>,
    scoring: Arc<dyn ScoringPolicy>,
    rules: TimerRules,
    limit_reached: Arc<AtomicBool>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionSource>, reporter: Arc<dyn ScoreReporter>) -> Self {
        Self {
            questions,
            reporter,
            scoring: Arc::new(ScoringRule::default()),
            rules: TimerRules::default(),
            limit_reached: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: Arc<dyn ScoringPolicy>) -> Self {
        self.scoring = scoring;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: TimerRules) -> Self {
        self.rules = rules;
        self
    }

    /// Whether the backend reported the daily limit during this run.
    #[must_use]
    pub fn limit_reached(&self) -> bool {
        self.limit_reached.load(Ordering::Relaxed)
    }

    /// Fetch a non-empty question pool.
    ///
    /// Once the daily limit was reported the source is not asked again.
    ///
    /// # Errors
    ///
    /// Returns `StartError::RateLimited`, `StartError::Load`, or
    /// `StartError::EmptyPool`.
    pub async fn load_questions(
        &self,
        user: UserId,
        options: QuestionOptions,
    ) -> Result<Vec<Question>, StartError> {
        if self.limit_reached() {
            return Err(StartError::RateLimited);
        }

        match self.questions.fetch_questions(user, options).await {
            Ok(questions) if questions.is_empty() => {
                warn!(%user, "question source returned no questions");
                Err(StartError::EmptyPool)
            }
            Ok(questions) => {
                debug!(%user, count = questions.len(), "questions loaded");
                Ok(questions)
            }
            Err(QuestionSourceError::RateLimited) => {
                info!(%user, "daily question limit reached");
                self.limit_reached.store(true, Ordering::Relaxed);
                Err(StartError::RateLimited)
            }
            Err(err) => {
                warn!(%user, error = %err, "failed to load questions");
                Err(err.into())
            }
        }
    }

    /// Load questions and start a new session for the user.
    ///
    /// # Errors
    ///
    /// Returns `StartError` when questions cannot be loaded; no session is
    /// started in that case.
    pub async fn start_session(
        &self,
        user: UserId,
        options: SessionOptions,
    ) -> Result<QuizSession, StartError> {
        let mut session = QuizSession::new(self.rules);
        self.restart_session(&mut session, user, options).await?;
        Ok(session)
    }

    /// Reload questions and start `session` over, as the Result screen's
    /// restart button does. The session is back on Welcome if loading fails.
    ///
    /// # Errors
    ///
    /// Returns `StartError` when questions cannot be loaded.
    pub async fn restart_session(
        &self,
        session: &mut QuizSession,
        user: UserId,
        options: SessionOptions,
    ) -> Result<(), StartError> {
        session.restart();
        let pool = self.load_questions(user, options.question_options()).await?;
        session.start(pool, options.practice_mode)?;
        info!(
            %user,
            pool = session.pool_len(),
            practice_mode = options.practice_mode,
            "quiz started"
        );
        Ok(())
    }

    /// Compute the final result and dispatch the coin report.
    ///
    /// The report runs as a detached task; its failure is logged and never
    /// reaches the caller. Practice sessions and already-reported sessions
    /// dispatch nothing. Outside a Tokio runtime the report is skipped with a
    /// warning and the session stays unreported.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` if the session is still running.
    pub fn finish(
        &self,
        session: &mut QuizSession,
        user: UserId,
    ) -> Result<FinishedSession, SessionError> {
        let result = session.final_result(self.scoring.as_ref())?;
        info!(
            %user,
            score = result.score,
            answered = result.answered_count,
            final_score = result.final_score,
            practice_mode = result.practice_mode,
            "quiz finished"
        );

        if result.practice_mode {
            debug!(%user, "practice mode: coins not added");
            return Ok(FinishedSession {
                result,
                report: None,
            });
        }
        let Ok(runtime) = Handle::try_current() else {
            warn!(%user, "no async runtime: score report skipped");
            return Ok(FinishedSession {
                result,
                report: None,
            });
        };
        if !session.mark_reported() {
            return Ok(FinishedSession {
                result,
                report: None,
            });
        }

        let reporter = Arc::clone(&self.reporter);
        let amount = result.final_score;
        let report = runtime.spawn(async move {
            match reporter.report_score(user, amount).await {
                Ok(()) => info!(%user, amount, "coins added"),
                Err(err) => warn!(%user, amount, error = %err, "failed to report score"),
            }
        });

        Ok(FinishedSession {
            result,
            report: Some(report),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use wordbottle_core::model::{AnswerOption, OptionId, Phase, QuestionId};

    use super::*;
    use crate::error::ReportError;

    struct FixedSource;

    #[async_trait]
    impl QuestionSource for FixedSource {
        async fn fetch_questions(
            &self,
            _user: UserId,
            _options: QuestionOptions,
        ) -> Result<Vec<Question>, QuestionSourceError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct CountingReporter {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ScoreReporter for CountingReporter {
        async fn report_score(&self, _user: UserId, _amount: u32) -> Result<(), ReportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn finished_session() -> QuizSession {
        let question = Question::new(
            QuestionId::new(1),
            "apple",
            vec![AnswerOption::new(OptionId::new(1), "olma", true)],
        )
        .unwrap();
        let mut session = QuizSession::new(TimerRules::default());
        session.start(vec![question], false).unwrap();
        session.submit_answer(0).unwrap();
        assert_eq!(session.phase(), Phase::Finished);
        session
    }

    #[test]
    fn finish_without_runtime_skips_report() {
        let reporter = Arc::new(CountingReporter::default());
        let service = QuizLoopService::new(Arc::new(FixedSource), reporter.clone());
        let mut session = finished_session();

        let finished = service.finish(&mut session, UserId::new(7)).unwrap();
        assert_eq!(finished.result.score, 1);
        assert!(finished.report.is_none());
        assert_eq!(reporter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn finish_inside_runtime_dispatches_report() {
        let reporter = Arc::new(CountingReporter::default());
        let service = QuizLoopService::new(Arc::new(FixedSource), reporter.clone());
        let mut session = finished_session();

        let finished = service.finish(&mut session, UserId::new(7)).unwrap();
        finished.report.unwrap().await.unwrap();
        assert_eq!(reporter.calls.load(Ordering::SeqCst), 1);
    }
}
