mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::QuizProgress;
pub use service::{AdvanceOutcome, AdvanceTicket, AnswerOutcome, QuizSession, SessionState};
pub use view::{OptionState, OptionView, QuestionView};
pub use workflow::{QuizLoopService, SessionAdvanceResult, SessionAnswerResult};
