use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("first-try correct ({correct}) exceeds total questions ({total})")]
    CorrectExceedsTotal { total: u32, correct: u32 },

    #[error("too many questions for a single summary: {len}")]
    TooManyQuestions { len: usize },
}

/// Qualitative grading of a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreBand {
    /// 90% and above.
    Excellent,
    /// 70% up to 90%.
    Good,
    /// 50% up to 70%.
    Fair,
    /// Below 50%.
    NeedsRetry,
}

impl ScoreBand {
    /// Maps a percentage onto its band. Bounds are inclusive at the bottom.
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => ScoreBand::Excellent,
            70..90 => ScoreBand::Good,
            50..70 => ScoreBand::Fair,
            _ => ScoreBand::NeedsRetry,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::Fair => "fair",
            ScoreBand::NeedsRetry => "needs retry",
        }
    }

    /// Message shown on the results screen.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Отлично! 🌟",
            ScoreBand::Good => "Хорошо! 👍",
            ScoreBand::Fair => "Неплохо! 😊",
            ScoreBand::NeedsRetry => "Попробуй еще раз! 💪",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "green",
            ScoreBand::Good => "blue",
            ScoreBand::Fair => "orange",
            ScoreBand::NeedsRetry => "red",
        }
    }
}

/// Final tally of a quiz run. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSummary")]
pub struct ResultSummary {
    total: u32,
    first_try_correct: u32,
}

/// Unchecked wire form; deserialization goes through `ResultSummary::new`.
#[derive(Deserialize)]
struct RawSummary {
    total: u32,
    first_try_correct: u32,
}

impl TryFrom<RawSummary> for ResultSummary {
    type Error = ScoreError;

    fn try_from(raw: RawSummary) -> Result<Self, Self::Error> {
        Self::new(raw.total, raw.first_try_correct)
    }
}

impl ResultSummary {
    /// # Errors
    ///
    /// Returns `ScoreError::CorrectExceedsTotal` if `first_try_correct > total`.
    pub fn new(total: u32, first_try_correct: u32) -> Result<Self, ScoreError> {
        if first_try_correct > total {
            return Err(ScoreError::CorrectExceedsTotal {
                total,
                correct: first_try_correct,
            });
        }
        Ok(Self {
            total,
            first_try_correct,
        })
    }

    /// Builds a summary from in-memory counters.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::TooManyQuestions` if a count cannot fit in `u32`,
    /// or `ScoreError::CorrectExceedsTotal` for an inconsistent tally.
    pub fn from_counts(total: usize, first_try_correct: usize) -> Result<Self, ScoreError> {
        let total_u32 =
            u32::try_from(total).map_err(|_| ScoreError::TooManyQuestions { len: total })?;
        let correct_u32 = u32::try_from(first_try_correct).map_err(|_| {
            ScoreError::TooManyQuestions {
                len: first_try_correct,
            }
        })?;
        Self::new(total_u32, correct_u32)
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn first_try_correct(&self) -> u32 {
        self.first_try_correct
    }

    /// Questions that needed more than one attempt.
    #[must_use]
    pub fn mistakes(&self) -> u32 {
        self.total.saturating_sub(self.first_try_correct)
    }

    /// Truncated percentage of first-try successes; 0 for an empty run.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = u64::from(self.first_try_correct) * 100 / u64::from(self.total);
        u32::try_from(pct).unwrap_or(100)
    }

    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_percentage(self.percentage())
    }
}
