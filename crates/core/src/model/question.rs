use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use thiserror::Error;

use crate::model::catalogue::Topic;
use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("correct answer cannot be empty")]
    EmptyAnswer,

    #[error("question needs at least one distractor")]
    NoDistractors,

    #[error("answer option {0:?} appears more than once")]
    DuplicateOption(String),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question.
///
/// Options are shuffled once on construction and never reordered afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    correct_answer: String,
    options: Vec<String>,
    spoken_prompt: Option<String>,
}

impl Question {
    /// Builds a question from a correct answer and its distractors.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyAnswer` if the correct answer is blank,
    /// `QuestionError::NoDistractors` if `wrong_answers` is empty, and
    /// `QuestionError::DuplicateOption` if any option repeats.
    pub fn new<R: Rng + ?Sized>(
        id: QuestionId,
        text: impl Into<String>,
        correct_answer: impl Into<String>,
        wrong_answers: Vec<String>,
        spoken_prompt: Option<String>,
        rng: &mut R,
    ) -> Result<Self, QuestionError> {
        let correct_answer = correct_answer.into();
        if correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        if wrong_answers.is_empty() {
            return Err(QuestionError::NoDistractors);
        }

        let mut seen = HashSet::with_capacity(wrong_answers.len() + 1);
        seen.insert(correct_answer.as_str());
        for wrong in &wrong_answers {
            if !seen.insert(wrong.as_str()) {
                return Err(QuestionError::DuplicateOption(wrong.clone()));
            }
        }

        Ok(Self::assemble(
            id,
            text.into(),
            correct_answer,
            wrong_answers,
            spoken_prompt,
            rng,
        ))
    }

    /// Infallible constructor for generators that already guarantee distinct options.
    pub(crate) fn assemble<R: Rng + ?Sized>(
        id: QuestionId,
        text: String,
        correct_answer: String,
        wrong_answers: Vec<String>,
        spoken_prompt: Option<String>,
        rng: &mut R,
    ) -> Self {
        debug_assert!(!wrong_answers.contains(&correct_answer));

        let mut options = Vec::with_capacity(wrong_answers.len() + 1);
        options.push(correct_answer.clone());
        options.extend(wrong_answers);
        options.shuffle(rng);

        Self {
            id,
            text,
            correct_answer,
            options,
            spoken_prompt,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    /// On-screen prompt. Empty when the question is only spoken.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn spoken_prompt(&self) -> Option<&str> {
        self.spoken_prompt.as_deref()
    }

    /// Text a speech engine should read for this question.
    #[must_use]
    pub fn speech_text(&self) -> &str {
        self.spoken_prompt.as_deref().unwrap_or(&self.text)
    }

    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// Ordered questions for a single run of one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    topic: Topic,
    questions: Vec<Question>,
}

impl QuestionSet {
    #[must_use]
    pub fn new(topic: Topic, questions: Vec<Question>) -> Self {
        Self { topic, questions }
    }

    #[must_use]
    pub fn topic(&self) -> Topic {
        self.topic
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
