use std::collections::HashSet;
use std::fmt;

use rand::{Rng, rng};
use tracing::debug;
use wordbottle_core::ScoringPolicy;
use wordbottle_core::model::{FinalResult, Phase, Question, QuestionId, TimerRules};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── EVENT OUTCOMES ────────────────────────────────────────────────────────────
//

/// What happened when an answer was submitted, for the host's feedback cue.
///
/// The state transition is already applied when this is returned; showing the
/// cue before the next question is purely a presentation delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    /// Index of the first option flagged correct, if the question had one.
    pub correct_index: Option<usize>,
    /// Signed change applied to the clock (`+2` / `-3` with default rules).
    pub time_delta: i64,
    /// The answer ended the session (pool exhausted or clock at zero).
    pub finished: bool,
}

/// Result of one elapsed second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is not running; late ticks are dropped.
    Ignored,
    Running { remaining: u32 },
    /// The clock reached zero and the session finished.
    Expired,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One playthrough: question sequencing, scoring, and the countdown.
///
/// Questions are drawn uniformly at random from the pool without repetition.
/// The session finishes either when the pool is exhausted or when the clock
/// reaches zero, whichever happens first; events arriving after that are no-ops.
pub struct QuizSession {
    rules: TimerRules,
    phase: Phase,
    pool: Vec<Question>,
    used_ids: HashSet<QuestionId>,
    current: Option<usize>,
    score: u32,
    answered_count: u32,
    time_remaining: u32,
    practice_mode: bool,
    reported: bool,
}

impl QuizSession {
    /// Create an idle session sitting on the Welcome screen.
    #[must_use]
    pub fn new(rules: TimerRules) -> Self {
        Self {
            rules,
            phase: Phase::Welcome,
            pool: Vec::new(),
            used_ids: HashSet::new(),
            current: None,
            score: 0,
            answered_count: 0,
            time_remaining: rules.initial_secs,
            practice_mode: false,
            reported: false,
        }
    }

    /// Begin a playthrough over `pool` and draw the first question.
    ///
    /// Starting from `Finished` resets to `Welcome` first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` if `pool` is empty; the session then
    /// stays on the Welcome screen.
    /// Returns `SessionError::AlreadyRunning` if a playthrough is in progress.
    pub fn start(
        &mut self,
        pool: Vec<Question>,
        practice_mode: bool,
    ) -> Result<&Question, SessionError> {
        if self.phase.is_running() {
            return Err(SessionError::AlreadyRunning);
        }
        self.restart();
        if pool.is_empty() {
            return Err(SessionError::EmptyPool);
        }

        self.pool = pool;
        self.practice_mode = practice_mode;
        self.phase = Phase::Running;
        debug!(
            pool = self.pool.len(),
            practice_mode, "quiz session started"
        );

        self.next_question().ok_or(SessionError::EmptyPool)
    }

    /// Draw a question not yet presented in this playthrough.
    ///
    /// Returns `None` and finishes the session once every question was used.
    /// Does nothing outside `Running`.
    pub fn next_question(&mut self) -> Option<&Question> {
        if !self.phase.is_running() {
            return None;
        }

        let available: Vec<usize> = self
            .pool
            .iter()
            .enumerate()
            .filter(|(_, question)| !self.used_ids.contains(&question.id()))
            .map(|(idx, _)| idx)
            .collect();

        if available.is_empty() {
            debug!(answered = self.answered_count, "question pool exhausted");
            self.finish_now();
            return None;
        }

        let picked = available[rng().random_range(0..available.len())];
        self.used_ids.insert(self.pool[picked].id());
        self.current = Some(picked);
        Some(&self.pool[picked])
    }

    /// Answer the current question with the option at `index` and advance.
    ///
    /// Returns `Ok(None)` when the session is no longer running, so an answer
    /// racing the timer is dropped.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOption` if `index` is out of range; the
    /// session is left untouched.
    pub fn submit_answer(&mut self, index: usize) -> Result<Option<AnswerFeedback>, SessionError> {
        if !self.phase.is_running() {
            return Ok(None);
        }
        let Some(question) = self.current_question() else {
            return Ok(None);
        };

        let len = question.options().len();
        if index >= len {
            return Err(SessionError::InvalidOption { index, len });
        }
        let correct = question.is_correct(index);
        let correct_index = question.correct_index();

        let before = self.time_remaining;
        if correct {
            self.score = self.score.saturating_add(1);
        }
        self.time_remaining = self.rules.apply(before, correct);
        self.answered_count = self.answered_count.saturating_add(1);

        if self.time_remaining == 0 {
            debug!("clock emptied by penalty");
            self.finish_now();
        } else {
            self.next_question();
        }

        Ok(Some(AnswerFeedback {
            correct,
            correct_index,
            time_delta: i64::from(self.time_remaining) - i64::from(before),
            finished: self.phase == Phase::Finished,
        }))
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.phase.is_running() {
            return TickOutcome::Ignored;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            debug!(answered = self.answered_count, "quiz clock expired");
            self.finish_now();
            return TickOutcome::Expired;
        }

        TickOutcome::Running {
            remaining: self.time_remaining,
        }
    }

    /// Compute the Result-screen numbers with the given policy.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` unless the session has finished.
    pub fn final_result(&self, policy: &dyn ScoringPolicy) -> Result<FinalResult, SessionError> {
        if self.phase != Phase::Finished {
            return Err(SessionError::NotFinished);
        }

        Ok(FinalResult {
            score: self.score,
            answered_count: self.answered_count,
            final_score: policy.final_score(self.score),
            practice_mode: self.practice_mode,
        })
    }

    /// Return to the Welcome screen and forget the playthrough. Idempotent.
    pub fn restart(&mut self) {
        self.phase = Phase::Welcome;
        self.pool.clear();
        self.used_ids.clear();
        self.current = None;
        self.score = 0;
        self.answered_count = 0;
        self.time_remaining = self.rules.initial_secs;
        self.practice_mode = false;
        self.reported = false;
    }

    /// Leave a playthrough from the quiz screen. Same reset as `restart`.
    pub fn go_back(&mut self) {
        self.restart();
    }

    /// Flag the score as dispatched. Returns `false` if it already was.
    pub(crate) fn mark_reported(&mut self) -> bool {
        !std::mem::replace(&mut self.reported, true)
    }

    fn finish_now(&mut self) {
        self.phase = Phase::Finished;
        self.current = None;
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.map(|idx| &self.pool[idx])
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn answered_count(&self) -> u32 {
        self.answered_count
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn practice_mode(&self) -> bool {
        self.practice_mode
    }

    #[must_use]
    pub fn used_ids(&self) -> &HashSet<QuestionId> {
        &self.used_ids
    }

    #[must_use]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let remaining = self
            .pool
            .iter()
            .filter(|question| !self.used_ids.contains(&question.id()))
            .count();
        SessionProgress {
            phase: self.phase,
            total: self.pool.len(),
            answered: self.answered_count,
            remaining,
            score: self.score,
            time_remaining: self.time_remaining,
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase)
            .field("pool_len", &self.pool.len())
            .field("used", &self.used_ids.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("answered_count", &self.answered_count)
            .field("time_remaining", &self.time_remaining)
            .field("practice_mode", &self.practice_mode)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use wordbottle_core::ScoringRule;
    use wordbottle_core::model::{AnswerOption, OptionId};

    /// Option 0 is always the correct one.
    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("word {id}"),
            vec![
                AnswerOption::new(OptionId::new(id * 10), "right", true),
                AnswerOption::new(OptionId::new(id * 10 + 1), "wrong", false),
                AnswerOption::new(OptionId::new(id * 10 + 2), "also wrong", false),
            ],
        )
        .unwrap()
    }

    fn build_pool(n: u64) -> Vec<Question> {
        (1..=n).map(build_question).collect()
    }

    fn running(n: u64) -> QuizSession {
        let mut session = QuizSession::new(TimerRules::default());
        session.start(build_pool(n), false).unwrap();
        session
    }

    fn assert_invariants(session: &QuizSession, pool_ids: &HashSet<QuestionId>) {
        assert!(session.score() <= session.answered_count());
        assert!(session.used_ids().is_subset(pool_ids));
        assert_eq!(
            session.current_question().is_some(),
            session.phase() == Phase::Running
        );
    }

    #[test]
    fn new_session_waits_on_welcome() {
        let session = QuizSession::new(TimerRules::default());
        assert_eq!(session.phase(), Phase::Welcome);
        assert_eq!(session.time_remaining(), 20);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn empty_pool_keeps_welcome() {
        let mut session = QuizSession::new(TimerRules::default());
        let err = session.start(Vec::new(), false).unwrap_err();
        assert_eq!(err, SessionError::EmptyPool);
        assert_eq!(session.phase(), Phase::Welcome);
    }

    #[test]
    fn start_draws_a_pool_member() {
        let mut session = QuizSession::new(TimerRules::default());
        let pool_ids: HashSet<_> = build_pool(4).iter().map(Question::id).collect();
        let first = session.start(build_pool(4), false).unwrap().id();

        assert!(pool_ids.contains(&first));
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.used_ids().len(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn start_while_running_is_rejected() {
        let mut session = running(3);
        let err = session.start(build_pool(3), false).unwrap_err();
        assert_eq!(err, SessionError::AlreadyRunning);
        assert_eq!(session.used_ids().len(), 1);
    }

    #[test]
    fn used_ids_grow_by_one_per_draw() {
        let mut session = running(6);
        let pool_ids: HashSet<_> = build_pool(6).iter().map(Question::id).collect();

        for expected in 2..=6 {
            let id = session.next_question().map(Question::id).unwrap();
            assert!(pool_ids.contains(&id));
            assert_eq!(session.used_ids().len(), expected);
            assert!(session.used_ids().is_subset(&pool_ids));
        }
    }

    #[test]
    fn exhausting_the_pool_finishes() {
        let mut session = running(3);
        let pool_ids: HashSet<_> = build_pool(3).iter().map(Question::id).collect();

        for answered in 1..=3 {
            let feedback = session.submit_answer(0).unwrap().unwrap();
            assert_invariants(&session, &pool_ids);
            assert_eq!(feedback.finished, answered == 3);
        }

        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.used_ids().len(), 3);
        assert!(session.next_question().is_none());
    }

    #[test]
    fn scoring_example_three_right_two_wrong() {
        let mut session = running(5);
        let pool_ids: HashSet<_> = build_pool(5).iter().map(Question::id).collect();

        for index in [1, 0, 2, 0, 0] {
            session.submit_answer(index).unwrap();
            assert_invariants(&session, &pool_ids);
        }

        assert_eq!(session.score(), 3);
        assert_eq!(session.answered_count(), 5);
        assert_eq!(session.time_remaining(), 20 + 3 * 2 - 2 * 3);
        assert_eq!(session.phase(), Phase::Finished);
    }

    #[test]
    fn feedback_reports_time_delta() {
        let mut session = running(4);

        let right = session.submit_answer(0).unwrap().unwrap();
        assert!(right.correct);
        assert_eq!(right.time_delta, 2);
        assert_eq!(right.correct_index, Some(0));

        let wrong = session.submit_answer(2).unwrap().unwrap();
        assert!(!wrong.correct);
        assert_eq!(wrong.time_delta, -3);
    }

    #[test]
    fn invalid_option_leaves_state_untouched() {
        let mut session = running(2);
        let current = session.current_question().map(Question::id);

        let err = session.submit_answer(3).unwrap_err();
        assert_eq!(err, SessionError::InvalidOption { index: 3, len: 3 });
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.time_remaining(), 20);
        assert_eq!(session.current_question().map(Question::id), current);
    }

    #[test]
    fn question_without_correct_option_never_scores() {
        let broken = Question::new(
            QuestionId::new(9),
            "mystery",
            vec![
                AnswerOption::new(OptionId::new(1), "a", false),
                AnswerOption::new(OptionId::new(2), "b", false),
            ],
        )
        .unwrap();
        let mut session = QuizSession::new(TimerRules::default());
        session.start(vec![broken], false).unwrap();

        let feedback = session.submit_answer(0).unwrap().unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.correct_index, None);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn timer_expiry_finishes_with_questions_left() {
        let mut session = running(10);

        for remaining in (1..20).rev() {
            assert_eq!(session.tick(), TickOutcome::Running { remaining });
        }
        assert_eq!(session.tick(), TickOutcome::Expired);

        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.time_remaining(), 0);
        assert!(session.progress().remaining > 0);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn penalty_to_zero_finishes() {
        let rules = TimerRules::default().with_initial_secs(3);
        let mut session = QuizSession::new(rules);
        session.start(build_pool(5), false).unwrap();

        let feedback = session.submit_answer(1).unwrap().unwrap();
        assert!(feedback.finished);
        assert_eq!(session.time_remaining(), 0);
        assert_eq!(session.phase(), Phase::Finished);
    }

    #[test]
    fn late_events_after_finish_are_ignored() {
        let mut session = running(1);
        session.submit_answer(0).unwrap();
        assert_eq!(session.phase(), Phase::Finished);

        let time = session.time_remaining();
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.submit_answer(0).unwrap(), None);
        assert_eq!(session.time_remaining(), time);
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn ticks_before_start_are_ignored() {
        let mut session = QuizSession::new(TimerRules::default());
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.time_remaining(), 20);
    }

    #[test]
    fn final_result_requires_finish() {
        let mut session = running(5);
        assert_eq!(
            session.final_result(&ScoringRule::FifthBonus).unwrap_err(),
            SessionError::NotFinished
        );

        for _ in 0..5 {
            session.submit_answer(0).unwrap();
        }
        let result = session.final_result(&ScoringRule::FifthBonus).unwrap();
        assert_eq!(result.score, 5);
        assert_eq!(result.answered_count, 5);
        assert_eq!(result.final_score, 6);
        assert!(!result.practice_mode);
    }

    #[test]
    fn restart_is_idempotent() {
        let mut session = running(4);
        session.submit_answer(0).unwrap();
        session.tick();

        session.restart();
        let once = format!("{session:?}");
        session.restart();
        let twice = format!("{session:?}");

        assert_eq!(once, twice);
        assert_eq!(session.phase(), Phase::Welcome);
        assert_eq!(session.time_remaining(), 20);
        assert!(session.used_ids().is_empty());
        assert_eq!(session.pool_len(), 0);
    }

    #[test]
    fn start_after_finish_resets_counters() {
        let mut session = running(1);
        session.submit_answer(0).unwrap();
        assert_eq!(session.phase(), Phase::Finished);

        session.start(build_pool(2), true).unwrap();
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.score(), 0);
        assert_eq!(session.answered_count(), 0);
        assert!(session.practice_mode());
    }

    #[test]
    fn mark_reported_only_once_per_playthrough() {
        let mut session = running(1);
        session.submit_answer(0).unwrap();
        assert!(session.mark_reported());
        assert!(!session.mark_reported());

        session.restart();
        assert!(session.mark_reported());
    }
}
