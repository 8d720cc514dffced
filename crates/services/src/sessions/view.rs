use super::progress::QuizProgress;

/// How an answer option should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    Open,
    /// Tried and rejected on this question.
    Wrong,
    /// The correct answer, after it was picked.
    Correct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub text: String,
    pub state: OptionState,
}

/// Snapshot of the current question for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub progress: QuizProgress,
    pub prompt: String,
    pub speech: String,
    pub options: Vec<OptionView>,
    /// Input is closed once the correct option was picked.
    pub locked: bool,
}
