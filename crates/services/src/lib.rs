#![forbid(unsafe_code)]

pub mod auto_advance;
pub mod error;
pub mod feedback;
pub mod sessions;

pub use quiz_core::{Clock, QuizSettings};
pub use sessions as session;

pub use auto_advance::AdvanceScheduler;
pub use error::SessionError;
pub use feedback::{QuizEvent, SpeechSink};

pub use sessions::{
    AdvanceOutcome, AdvanceTicket, AnswerOutcome, QuizLoopService, QuizProgress, QuizSession,
    SessionAdvanceResult, SessionAnswerResult, SessionState,
};
