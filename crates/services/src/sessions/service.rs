use chrono::{DateTime, Utc};
use log::debug;
use rand::Rng;
use rand::rngs::ThreadRng;
use std::collections::HashSet;
use std::fmt;

use quiz_core::model::{Question, QuestionSet, ResultSummary, Topic};
use quiz_core::{Clock, QuestionGenerator};

use super::progress::QuizProgress;
use super::view::{OptionState, OptionView, QuestionView};
use crate::error::SessionError;

//
// ─── STATES & OUTCOMES ─────────────────────────────────────────────────────────
//

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No question set has been built yet.
    Idle,
    /// Asking the question at `index`.
    InProgress { index: usize },
    /// Every question has been advanced past.
    Completed,
}

/// What a submitted answer did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Matched the correct answer. `first_try` is true when it counted toward the score.
    Correct { first_try: bool },
    /// Did not match; the option is now marked wrong.
    Incorrect,
    /// The current question was already answered correctly; nothing changed.
    AlreadyAnswered,
    /// No question is active.
    Ignored,
}

/// What an advance request did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Moved { index: usize },
    Completed,
    /// The session was idle or already completed.
    Ignored,
    /// The ticket belongs to an earlier run or an earlier question.
    Stale,
}

/// Identifies the question a delayed advance was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvanceTicket {
    generation: u64,
    question_index: usize,
}

impl AdvanceTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz run over one topic.
///
/// Owns the generated questions and every per-question flag so the host only
/// renders what the session reports. Calls made in the wrong state are no-ops.
pub struct QuizSession<R = ThreadRng> {
    generator: QuestionGenerator<R>,
    clock: Clock,
    questions: Option<QuestionSet>,
    state: SessionState,
    wrong_answers: HashSet<String>,
    answered_incorrectly: bool,
    answered_correctly: bool,
    first_try_correct: usize,
    generation: u64,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl<R: Rng> QuizSession<R> {
    #[must_use]
    pub fn new(generator: QuestionGenerator<R>, clock: Clock) -> Self {
        Self {
            generator,
            clock,
            questions: None,
            state: SessionState::Idle,
            wrong_answers: HashSet::new(),
            answered_incorrectly: false,
            answered_correctly: false,
            first_try_correct: 0,
            generation: 0,
            started_at: None,
            completed_at: None,
        }
    }

    /// Builds a fresh question set and asks the first question.
    pub fn start(&mut self, topic: Topic) {
        let questions = self.generator.generate(topic);
        self.start_with(questions);
    }

    /// Starts a run over a prepared question set. An empty set completes at once.
    pub fn start_with(&mut self, questions: QuestionSet) {
        self.generation = self.generation.wrapping_add(1);
        self.first_try_correct = 0;
        self.clear_question_state();
        self.started_at = Some(self.clock.now());
        self.completed_at = None;

        if questions.is_empty() {
            self.state = SessionState::Completed;
            self.completed_at = self.started_at;
        } else {
            self.state = SessionState::InProgress { index: 0 };
        }
        debug!(
            "quiz started: topic={:?} questions={} generation={}",
            questions.topic(),
            questions.len(),
            self.generation
        );
        self.questions = Some(questions);
    }

    /// Same as `start`, callable from any state.
    pub fn restart(&mut self, topic: Topic) {
        self.start(topic);
    }

    /// Checks `answer` against the current question.
    pub fn submit_answer(&mut self, answer: &str) -> AnswerOutcome {
        let Some(question) = self.current_question() else {
            return AnswerOutcome::Ignored;
        };
        if self.answered_correctly {
            return AnswerOutcome::AlreadyAnswered;
        }

        if question.is_correct(answer) {
            let first_try = !self.answered_incorrectly;
            self.answered_correctly = true;
            if first_try {
                self.first_try_correct += 1;
            }
            AnswerOutcome::Correct { first_try }
        } else {
            self.wrong_answers.insert(answer.to_string());
            self.answered_incorrectly = true;
            AnswerOutcome::Incorrect
        }
    }

    /// Moves to the next question, or completes the run after the last one.
    pub fn advance(&mut self) -> AdvanceOutcome {
        let SessionState::InProgress { index } = self.state else {
            return AdvanceOutcome::Ignored;
        };

        let next = index + 1;
        self.clear_question_state();
        if next < self.total_questions() {
            self.state = SessionState::InProgress { index: next };
            AdvanceOutcome::Moved { index: next }
        } else {
            self.state = SessionState::Completed;
            self.completed_at = Some(self.clock.now());
            debug!(
                "quiz completed: {}/{} first try",
                self.first_try_correct,
                self.total_questions()
            );
            AdvanceOutcome::Completed
        }
    }

    /// Advances only if `ticket` still refers to the live question.
    pub fn advance_for(&mut self, ticket: AdvanceTicket) -> AdvanceOutcome {
        let current = match self.state {
            SessionState::InProgress { index } => index,
            SessionState::Idle | SessionState::Completed => return AdvanceOutcome::Ignored,
        };
        if ticket.generation != self.generation || ticket.question_index != current {
            debug!(
                "dropping stale advance: ticket={ticket:?} generation={} index={current}",
                self.generation
            );
            return AdvanceOutcome::Stale;
        }
        self.advance()
    }
}

impl<R> QuizSession<R> {
    fn clear_question_state(&mut self) {
        self.wrong_answers.clear();
        self.answered_incorrectly = false;
        self.answered_correctly = false;
    }

    fn total_questions(&self) -> usize {
        self.questions.as_ref().map_or(0, QuestionSet::len)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Topic of the current run, `None` before the first start.
    #[must_use]
    pub fn topic(&self) -> Option<Topic> {
        self.questions.as_ref().map(QuestionSet::topic)
    }

    #[must_use]
    pub fn questions(&self) -> Option<&QuestionSet> {
        self.questions.as_ref()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::InProgress { index } => self.questions.as_ref()?.get(index),
            SessionState::Idle | SessionState::Completed => None,
        }
    }

    /// Options marked wrong for the current question.
    #[must_use]
    pub fn wrong_answers(&self) -> &HashSet<String> {
        &self.wrong_answers
    }

    #[must_use]
    pub fn has_answered_incorrectly(&self) -> bool {
        self.answered_incorrectly
    }

    #[must_use]
    pub fn has_answered_correctly(&self) -> bool {
        self.answered_correctly
    }

    #[must_use]
    pub fn first_try_correct(&self) -> usize {
        self.first_try_correct
    }

    /// Incremented on every start or restart.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Ticket for a delayed advance away from the current question.
    #[must_use]
    pub fn advance_ticket(&self) -> Option<AdvanceTicket> {
        match self.state {
            SessionState::InProgress { index } => Some(AdvanceTicket {
                generation: self.generation,
                question_index: index,
            }),
            SessionState::Idle | SessionState::Completed => None,
        }
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.total_questions();
        let (position, done) = match self.state {
            SessionState::Idle => (0, 0),
            SessionState::InProgress { index } => (index + 1, index),
            SessionState::Completed => (total, total),
        };
        QuizProgress {
            position,
            total,
            done,
            is_complete: self.is_complete(),
        }
    }

    /// Render-ready snapshot of the current question.
    #[must_use]
    pub fn question_view(&self) -> Option<QuestionView> {
        let question = self.current_question()?;
        let options = question
            .options()
            .iter()
            .map(|option| {
                let state = if self.wrong_answers.contains(option) {
                    OptionState::Wrong
                } else if self.answered_correctly && question.is_correct(option) {
                    OptionState::Correct
                } else {
                    OptionState::Open
                };
                OptionView {
                    text: option.clone(),
                    state,
                }
            })
            .collect();

        Some(QuestionView {
            progress: self.progress(),
            prompt: question.text().to_string(),
            speech: question.speech_text().to_string(),
            options,
            locked: self.answered_correctly,
        })
    }

    /// Scores the run so far.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the tally cannot be represented.
    pub fn summary(&self) -> Result<ResultSummary, SessionError> {
        Ok(ResultSummary::from_counts(
            self.total_questions(),
            self.first_try_correct,
        )?)
    }
}

impl<R> fmt::Debug for QuizSession<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("topic", &self.topic())
            .field("questions_len", &self.total_questions())
            .field("state", &self.state)
            .field("wrong_answers", &self.wrong_answers)
            .field("answered_incorrectly", &self.answered_incorrectly)
            .field("first_try_correct", &self.first_try_correct)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session(seed: u64) -> QuizSession<StdRng> {
        QuizSession::new(
            QuestionGenerator::new(StdRng::seed_from_u64(seed)),
            Clock::fixed(fixed_now()),
        )
    }

    fn wrong_option(session: &QuizSession<StdRng>) -> String {
        let question = session.current_question().unwrap();
        question
            .options()
            .iter()
            .find(|o| !question.is_correct(o))
            .unwrap()
            .clone()
    }

    fn correct_option(session: &QuizSession<StdRng>) -> String {
        session.current_question().unwrap().correct_answer().to_string()
    }

    #[test]
    fn idle_session_ignores_input() {
        let mut session = session(1);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.submit_answer("7"), AnswerOutcome::Ignored);
        assert_eq!(session.advance(), AdvanceOutcome::Ignored);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.first_try_correct(), 0);
        assert!(session.current_question().is_none());
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn start_enters_first_question() {
        let mut session = session(1);
        session.start(Topic::Digits);
        assert_eq!(session.state(), SessionState::InProgress { index: 0 });
        assert_eq!(session.generation(), 1);
        assert_eq!(session.started_at(), Some(fixed_now()));
        assert_eq!(session.progress().position, 1);
        assert_eq!(session.progress().total, 20);
    }

    #[test]
    fn wrong_then_right_does_not_score() {
        let mut session = session(2);
        session.start(Topic::Digits);
        let wrong = wrong_option(&session);
        let right = correct_option(&session);

        assert_eq!(session.submit_answer(&wrong), AnswerOutcome::Incorrect);
        assert!(session.wrong_answers().contains(&wrong));
        assert_eq!(session.wrong_answers().len(), 1);
        assert!(session.has_answered_incorrectly());
        assert_eq!(session.first_try_correct(), 0);

        // repeating the same wrong answer changes nothing
        assert_eq!(session.submit_answer(&wrong), AnswerOutcome::Incorrect);
        assert_eq!(session.wrong_answers().len(), 1);

        assert_eq!(
            session.submit_answer(&right),
            AnswerOutcome::Correct { first_try: false }
        );
        assert_eq!(session.first_try_correct(), 0);
    }

    #[test]
    fn first_try_counts_once() {
        let mut session = session(3);
        session.start(Topic::Digits);
        let right = correct_option(&session);

        assert_eq!(
            session.submit_answer(&right),
            AnswerOutcome::Correct { first_try: true }
        );
        assert_eq!(session.submit_answer(&right), AnswerOutcome::AlreadyAnswered);
        assert_eq!(session.first_try_correct(), 1);

        let wrong = wrong_option(&session);
        assert_eq!(session.submit_answer(&wrong), AnswerOutcome::AlreadyAnswered);
        assert!(session.wrong_answers().is_empty());
    }

    #[test]
    fn advance_clears_question_state() {
        let mut session = session(4);
        session.start(Topic::Digits);
        let wrong = wrong_option(&session);
        session.submit_answer(&wrong);

        assert_eq!(session.advance(), AdvanceOutcome::Moved { index: 1 });
        assert!(session.wrong_answers().is_empty());
        assert!(!session.has_answered_incorrectly());
        assert!(!session.has_answered_correctly());
    }

    #[test]
    fn full_perfect_run_completes() {
        let mut session = session(5);
        session.start(Topic::Digits);

        for step in 0..20 {
            let right = correct_option(&session);
            session.submit_answer(&right);
            assert!(session.first_try_correct() <= step + 1);
            let outcome = session.advance();
            if step < 19 {
                assert_eq!(outcome, AdvanceOutcome::Moved { index: step + 1 });
            } else {
                assert_eq!(outcome, AdvanceOutcome::Completed);
            }
        }

        assert!(session.is_complete());
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert_eq!(session.advance(), AdvanceOutcome::Ignored);
        assert_eq!(session.submit_answer("1"), AnswerOutcome::Ignored);

        let summary = session.summary().unwrap();
        assert_eq!(summary.total(), 20);
        assert_eq!(summary.first_try_correct(), 20);
        assert_eq!(summary.percentage(), 100);
        assert_eq!(summary.band().label(), "excellent");
    }

    #[test]
    fn restart_discards_previous_run() {
        let mut session = session(6);
        session.start(Topic::Digits);
        let first_order: Vec<String> = session
            .questions()
            .unwrap()
            .iter()
            .map(|q| q.correct_answer().to_string())
            .collect();

        let right = correct_option(&session);
        session.submit_answer(&right);
        session.advance();
        let wrong = wrong_option(&session);
        session.submit_answer(&wrong);

        session.restart(Topic::Digits);
        assert_eq!(session.state(), SessionState::InProgress { index: 0 });
        assert_eq!(session.first_try_correct(), 0);
        assert!(session.wrong_answers().is_empty());
        assert!(!session.has_answered_incorrectly());
        assert_eq!(session.generation(), 2);

        let second_order: Vec<String> = session
            .questions()
            .unwrap()
            .iter()
            .map(|q| q.correct_answer().to_string())
            .collect();
        assert_ne!(first_order, second_order);
    }

    #[test]
    fn stale_ticket_does_not_move_restarted_session() {
        let mut session = session(7);
        session.start(Topic::Letters);
        let right = correct_option(&session);
        session.submit_answer(&right);
        let ticket = session.advance_ticket().unwrap();

        session.restart(Topic::Letters);
        assert_eq!(session.advance_for(ticket), AdvanceOutcome::Stale);
        assert_eq!(session.state(), SessionState::InProgress { index: 0 });

        let fresh = session.advance_ticket().unwrap();
        assert_eq!(session.advance_for(fresh), AdvanceOutcome::Moved { index: 1 });
        // a second delivery of the same ticket is now stale
        assert_eq!(session.advance_for(fresh), AdvanceOutcome::Stale);
    }

    #[test]
    fn question_view_marks_options() {
        let mut session = session(8);
        session.start(Topic::Digits);
        let wrong = wrong_option(&session);
        let right = correct_option(&session);
        session.submit_answer(&wrong);
        session.submit_answer(&right);

        let view = session.question_view().unwrap();
        assert!(view.locked);
        assert_eq!(view.options.len(), 4);
        for option in &view.options {
            let expected = if option.text == wrong {
                OptionState::Wrong
            } else if option.text == right {
                OptionState::Correct
            } else {
                OptionState::Open
            };
            assert_eq!(option.state, expected);
        }
    }

    #[test]
    fn empty_set_completes_on_start() {
        let mut session = session(10);
        session.start_with(QuestionSet::new(Topic::Letters, Vec::new()));

        assert!(session.is_complete());
        assert_eq!(session.generation(), 1);
        assert!(session.current_question().is_none());
        assert_eq!(session.completed_at(), session.started_at());
        assert_eq!(session.submit_answer("а"), AnswerOutcome::Ignored);
        assert_eq!(session.advance(), AdvanceOutcome::Ignored);

        let summary = session.summary().unwrap();
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.percentage(), 0);
    }

    #[test]
    fn idle_summary_is_empty() {
        let session = session(9);
        let summary = session.summary().unwrap();
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.percentage(), 0);
    }
}
