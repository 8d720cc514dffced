use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use quiz_core::model::{ExerciseId, find_exercise};
use quiz_core::{Clock, QuestionGenerator, QuizSettings};

use super::service::{AdvanceOutcome, AdvanceTicket, AnswerOutcome, QuizSession};
use crate::error::SessionError;
use crate::feedback::QuizEvent;

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAnswerResult {
    pub outcome: AnswerOutcome,
    pub events: Vec<QuizEvent>,
}

/// Result of an advance request.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAdvanceResult {
    pub outcome: AdvanceOutcome,
    pub events: Vec<QuizEvent>,
}

/// Orchestrates quiz sessions and translates transitions into host events.
#[derive(Debug, Clone, Default)]
pub struct QuizLoopService {
    clock: Clock,
    settings: QuizSettings,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, settings: QuizSettings) -> Self {
        Self { clock, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Opens and starts a session for a catalogue exercise.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Catalogue` if the exercise is unknown or has no quiz.
    pub fn start_session<R: Rng>(
        &self,
        exercise_id: ExerciseId,
        generator: QuestionGenerator<R>,
    ) -> Result<(QuizSession<R>, Vec<QuizEvent>), SessionError> {
        let exercise = find_exercise(exercise_id)?;
        let topic = exercise.quiz_topic()?;
        info!("starting exercise {} ({})", exercise.id(), exercise.title());

        let mut session = QuizSession::new(generator, self.clock);
        session.start(topic);
        let events = self.opening_events(&session)?;
        Ok((session, events))
    }

    /// Restarts the session's current topic. Idle sessions stay idle.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` only if an empty run cannot be scored.
    pub fn restart<R: Rng>(
        &self,
        session: &mut QuizSession<R>,
    ) -> Result<Vec<QuizEvent>, SessionError> {
        let Some(topic) = session.topic() else {
            return Ok(Vec::new());
        };
        session.restart(topic);
        self.opening_events(session)
    }

    /// Checks `answer` and emits feedback plus a delayed advance on success.
    pub fn answer_current<R: Rng>(
        &self,
        session: &mut QuizSession<R>,
        answer: &str,
    ) -> SessionAnswerResult {
        let outcome = session.submit_answer(answer);
        let events = match outcome {
            AnswerOutcome::Correct { first_try } => {
                let mut events = vec![
                    self.speak(self.settings.praise_phrase(), Duration::ZERO),
                    QuizEvent::Correct { first_try },
                ];
                if let Some(ticket) = session.advance_ticket() {
                    events.push(QuizEvent::ScheduleAdvance {
                        ticket,
                        after: self.settings.auto_advance_delay(),
                    });
                }
                events
            }
            AnswerOutcome::Incorrect => vec![
                self.speak(self.settings.retry_phrase(), Duration::ZERO),
                QuizEvent::Incorrect {
                    answer: answer.to_string(),
                },
            ],
            AnswerOutcome::AlreadyAnswered | AnswerOutcome::Ignored => {
                debug!("answer {answer:?} ignored: {outcome:?}");
                Vec::new()
            }
        };
        SessionAnswerResult { outcome, events }
    }

    /// Applies a delivered advance ticket.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the finished run cannot be scored.
    pub fn advance_due<R: Rng>(
        &self,
        session: &mut QuizSession<R>,
        ticket: AdvanceTicket,
    ) -> Result<SessionAdvanceResult, SessionError> {
        let outcome = session.advance_for(ticket);
        self.after_advance(session, outcome)
    }

    /// Advances immediately, without a ticket.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the finished run cannot be scored.
    pub fn advance_now<R: Rng>(
        &self,
        session: &mut QuizSession<R>,
    ) -> Result<SessionAdvanceResult, SessionError> {
        let outcome = session.advance();
        self.after_advance(session, outcome)
    }

    /// Speaks the current question again, right away.
    #[must_use]
    pub fn repeat_prompt<R>(&self, session: &QuizSession<R>) -> Option<QuizEvent> {
        session
            .current_question()
            .map(|question| self.speak(question.speech_text(), Duration::ZERO))
    }

    fn after_advance<R: Rng>(
        &self,
        session: &QuizSession<R>,
        outcome: AdvanceOutcome,
    ) -> Result<SessionAdvanceResult, SessionError> {
        let events = match outcome {
            AdvanceOutcome::Moved { .. } => session
                .current_question()
                .map(|question| {
                    vec![self.speak(question.speech_text(), self.settings.next_prompt_delay())]
                })
                .unwrap_or_default(),
            AdvanceOutcome::Completed => {
                let summary = session.summary()?;
                info!(
                    "quiz finished: {}/{} ({}%, {})",
                    summary.first_try_correct(),
                    summary.total(),
                    summary.percentage(),
                    summary.band().label()
                );
                vec![QuizEvent::Completed(summary)]
            }
            AdvanceOutcome::Ignored | AdvanceOutcome::Stale => Vec::new(),
        };
        Ok(SessionAdvanceResult { outcome, events })
    }

    fn opening_events<R>(
        &self,
        session: &QuizSession<R>,
    ) -> Result<Vec<QuizEvent>, SessionError> {
        if let Some(question) = session.current_question() {
            return Ok(vec![
                self.speak(question.speech_text(), self.settings.first_prompt_delay()),
            ]);
        }
        // an empty set completes on start
        Ok(vec![QuizEvent::Completed(session.summary()?)])
    }

    fn speak(&self, text: &str, after: Duration) -> QuizEvent {
        QuizEvent::Speak {
            text: text.to_string(),
            after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{CatalogueError, QuestionSet, ScoreBand, Topic};
    use quiz_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn service() -> QuizLoopService {
        QuizLoopService::new(Clock::fixed(fixed_now()), QuizSettings::default())
    }

    fn generator(seed: u64) -> QuestionGenerator<StdRng> {
        QuestionGenerator::new(StdRng::seed_from_u64(seed))
    }

    fn ticket_of(events: &[QuizEvent]) -> Option<AdvanceTicket> {
        events.iter().find_map(|event| match event {
            QuizEvent::ScheduleAdvance { ticket, .. } => Some(*ticket),
            _ => None,
        })
    }

    #[test]
    fn start_speaks_first_prompt_after_a_second() {
        let (session, events) = service()
            .start_session(ExerciseId::new(7), generator(1))
            .unwrap();
        let question = session.current_question().unwrap();
        assert_eq!(
            events,
            vec![QuizEvent::Speak {
                text: format!("Найди букву {}", question.correct_answer()),
                after: Duration::from_secs(1),
            }]
        );
    }

    #[test]
    fn exercise_without_quiz_cannot_start() {
        let err = service()
            .start_session(ExerciseId::new(3), generator(1))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Catalogue(CatalogueError::NoQuiz { .. })
        ));
    }

    #[test]
    fn correct_answer_praises_and_schedules_advance() {
        let svc = service();
        let (mut session, _) = svc.start_session(ExerciseId::new(1), generator(2)).unwrap();
        let right = session.current_question().unwrap().correct_answer().to_string();

        let result = svc.answer_current(&mut session, &right);
        assert_eq!(result.outcome, AnswerOutcome::Correct { first_try: true });
        assert_eq!(
            result.events[0],
            QuizEvent::Speak {
                text: "Молодец!".into(),
                after: Duration::ZERO
            }
        );
        assert_eq!(result.events[1], QuizEvent::Correct { first_try: true });
        let ticket = ticket_of(&result.events).unwrap();
        assert_eq!(ticket.question_index(), 0);
        assert_eq!(ticket.generation(), session.generation());

        // a second tap produces nothing
        let again = svc.answer_current(&mut session, &right);
        assert!(again.events.is_empty());
    }

    #[test]
    fn wrong_answer_asks_to_retry() {
        let svc = service();
        let (mut session, _) = svc.start_session(ExerciseId::new(1), generator(3)).unwrap();
        let question = session.current_question().unwrap();
        let wrong = question
            .options()
            .iter()
            .find(|o| !question.is_correct(o))
            .unwrap()
            .clone();

        let result = svc.answer_current(&mut session, &wrong);
        assert_eq!(result.outcome, AnswerOutcome::Incorrect);
        assert_eq!(
            result.events,
            vec![
                QuizEvent::Speak {
                    text: "Попробуй еще раз".into(),
                    after: Duration::ZERO
                },
                QuizEvent::Incorrect { answer: wrong },
            ]
        );
    }

    #[test]
    fn half_right_run_ends_fair() {
        let svc = service();
        let (mut session, _) = svc.start_session(ExerciseId::new(1), generator(4)).unwrap();

        let mut last = None;
        for step in 0..20 {
            let question = session.current_question().unwrap();
            let right = question.correct_answer().to_string();
            if step % 2 == 1 {
                let wrong = question
                    .options()
                    .iter()
                    .find(|o| !question.is_correct(o))
                    .unwrap()
                    .clone();
                svc.answer_current(&mut session, &wrong);
            }
            let result = svc.answer_current(&mut session, &right);
            let ticket = ticket_of(&result.events).unwrap();
            last = Some(svc.advance_due(&mut session, ticket).unwrap());
        }

        let last = last.unwrap();
        assert_eq!(last.outcome, AdvanceOutcome::Completed);
        let QuizEvent::Completed(summary) = &last.events[0] else {
            panic!("expected completion event, got {:?}", last.events);
        };
        assert_eq!(summary.total(), 20);
        assert_eq!(summary.first_try_correct(), 10);
        assert_eq!(summary.percentage(), 50);
        assert_eq!(summary.band(), ScoreBand::Fair);
    }

    #[test]
    fn advance_speaks_next_prompt_after_half_a_second() {
        let svc = service();
        let (mut session, _) = svc.start_session(ExerciseId::new(1), generator(5)).unwrap();
        let result = svc.advance_now(&mut session).unwrap();
        assert_eq!(result.outcome, AdvanceOutcome::Moved { index: 1 });
        let question = session.current_question().unwrap();
        assert_eq!(
            result.events,
            vec![QuizEvent::Speak {
                text: question.text().to_string(),
                after: Duration::from_millis(500),
            }]
        );
    }

    #[test]
    fn restart_invalidates_pending_ticket() {
        let svc = service();
        let (mut session, _) = svc.start_session(ExerciseId::new(1), generator(6)).unwrap();
        let right = session.current_question().unwrap().correct_answer().to_string();
        let ticket = ticket_of(&svc.answer_current(&mut session, &right).events).unwrap();

        let events = svc.restart(&mut session).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(session.first_try_correct(), 0);

        let result = svc.advance_due(&mut session, ticket).unwrap();
        assert_eq!(result.outcome, AdvanceOutcome::Stale);
        assert!(result.events.is_empty());
        assert_eq!(session.progress().position, 1);
    }

    #[test]
    fn empty_set_opens_with_completion() {
        let svc = service();
        let mut session = QuizSession::new(generator(8), Clock::fixed(fixed_now()));
        session.start_with(QuestionSet::new(Topic::Digits, Vec::new()));

        let events = svc.opening_events(&session).unwrap();
        let [QuizEvent::Completed(summary)] = events.as_slice() else {
            panic!("expected a single completion event, got {events:?}");
        };
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.band(), ScoreBand::NeedsRetry);
        assert!(svc.repeat_prompt(&session).is_none());
    }

    #[test]
    fn repeat_prompt_is_immediate() {
        let svc = service();
        let (session, _) = svc.start_session(ExerciseId::new(1), generator(7)).unwrap();
        let Some(QuizEvent::Speak { after, .. }) = svc.repeat_prompt(&session) else {
            panic!("expected speak event");
        };
        assert_eq!(after, Duration::ZERO);
    }
}
