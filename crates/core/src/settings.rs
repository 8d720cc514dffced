use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("auto advance delay must be between 0 and 10000 ms")]
    InvalidAutoAdvanceDelay,

    #[error("prompt delay must be at most 5000 ms")]
    InvalidPromptDelay,

    #[error("feedback phrase cannot be empty")]
    EmptyPhrase,
}

const MAX_AUTO_ADVANCE: Duration = Duration::from_millis(10_000);
const MAX_PROMPT_DELAY: Duration = Duration::from_millis(5_000);

/// Timing and feedback configuration for a quiz run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    auto_advance_delay: Duration,
    first_prompt_delay: Duration,
    next_prompt_delay: Duration,
    praise_phrase: String,
    retry_phrase: String,
}

impl Default for QuizSettings {
    /// Two seconds of praise before moving on; the first prompt waits a second
    /// for the screen to settle, later prompts half a second.
    fn default() -> Self {
        Self {
            auto_advance_delay: Duration::from_millis(2_000),
            first_prompt_delay: Duration::from_millis(1_000),
            next_prompt_delay: Duration::from_millis(500),
            praise_phrase: "Молодец!".to_string(),
            retry_phrase: "Попробуй еще раз".to_string(),
        }
    }
}

impl QuizSettings {
    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a delay is out of range or a phrase is blank.
    pub fn new(
        auto_advance_delay: Duration,
        first_prompt_delay: Duration,
        next_prompt_delay: Duration,
        praise_phrase: impl Into<String>,
        retry_phrase: impl Into<String>,
    ) -> Result<Self, SettingsError> {
        if auto_advance_delay > MAX_AUTO_ADVANCE {
            return Err(SettingsError::InvalidAutoAdvanceDelay);
        }
        if first_prompt_delay > MAX_PROMPT_DELAY || next_prompt_delay > MAX_PROMPT_DELAY {
            return Err(SettingsError::InvalidPromptDelay);
        }
        let praise_phrase = praise_phrase.into();
        let retry_phrase = retry_phrase.into();
        if praise_phrase.trim().is_empty() || retry_phrase.trim().is_empty() {
            return Err(SettingsError::EmptyPhrase);
        }

        Ok(Self {
            auto_advance_delay,
            first_prompt_delay,
            next_prompt_delay,
            praise_phrase,
            retry_phrase,
        })
    }

    /// Returns a copy with a different auto-advance delay.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidAutoAdvanceDelay` if the delay is too long.
    pub fn with_auto_advance_delay(mut self, delay: Duration) -> Result<Self, SettingsError> {
        if delay > MAX_AUTO_ADVANCE {
            return Err(SettingsError::InvalidAutoAdvanceDelay);
        }
        self.auto_advance_delay = delay;
        Ok(self)
    }

    #[must_use]
    pub fn auto_advance_delay(&self) -> Duration {
        self.auto_advance_delay
    }

    #[must_use]
    pub fn first_prompt_delay(&self) -> Duration {
        self.first_prompt_delay
    }

    #[must_use]
    pub fn next_prompt_delay(&self) -> Duration {
        self.next_prompt_delay
    }

    #[must_use]
    pub fn praise_phrase(&self) -> &str {
        &self.praise_phrase
    }

    #[must_use]
    pub fn retry_phrase(&self) -> &str {
        &self.retry_phrase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_give_two_second_praise_window() {
        let settings = QuizSettings::default();
        assert_eq!(settings.auto_advance_delay(), Duration::from_secs(2));
        assert_eq!(settings.first_prompt_delay(), Duration::from_secs(1));
        assert_eq!(settings.next_prompt_delay(), Duration::from_millis(500));
        assert_eq!(settings.praise_phrase(), "Молодец!");
    }

    #[test]
    fn rejects_out_of_range_delays() {
        let long = Duration::from_secs(11);
        assert_eq!(
            QuizSettings::default().with_auto_advance_delay(long),
            Err(SettingsError::InvalidAutoAdvanceDelay)
        );
        assert_eq!(
            QuizSettings::new(
                Duration::ZERO,
                Duration::from_secs(6),
                Duration::ZERO,
                "a",
                "b"
            ),
            Err(SettingsError::InvalidPromptDelay)
        );
    }

    #[test]
    fn rejects_blank_phrases() {
        let err = QuizSettings::new(Duration::ZERO, Duration::ZERO, Duration::ZERO, " ", "b")
            .unwrap_err();
        assert_eq!(err, SettingsError::EmptyPhrase);
    }

    #[test]
    fn zero_delay_is_allowed() {
        let settings = QuizSettings::default()
            .with_auto_advance_delay(Duration::ZERO)
            .unwrap();
        assert_eq!(settings.auto_advance_delay(), Duration::ZERO);
    }
}
