//! Semantic events emitted for the presentation layer.

use std::time::Duration;

use quiz_core::model::ResultSummary;

use crate::sessions::AdvanceTicket;

/// Something the host should react to after an engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizEvent {
    /// Read `text` aloud after waiting `after`.
    Speak { text: String, after: Duration },
    /// The answer was right; `first_try` tells whether it scored.
    Correct { first_try: bool },
    /// The answer was wrong and is now marked on screen.
    Incorrect { answer: String },
    /// Deliver `ticket` back to the session once `after` has elapsed.
    ScheduleAdvance { ticket: AdvanceTicket, after: Duration },
    /// The run is over.
    Completed(ResultSummary),
}

/// Fire-and-forget speech output.
///
/// Implementations must return promptly; playback happens out of band.
pub trait SpeechSink: Send + Sync {
    /// Interrupts anything playing and starts `text`.
    fn speak(&self, text: &str);

    /// Silences playback, e.g. when leaving the quiz.
    fn stop(&self);
}
