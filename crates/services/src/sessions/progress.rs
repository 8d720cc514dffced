/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// One-based position of the current question; 0 before start.
    pub position: usize,
    pub total: usize,
    /// Questions already advanced past.
    pub done: usize,
    pub is_complete: bool,
}

impl QuizProgress {
    /// Completed share in `[0, 1]`, suitable for a progress bar.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return if self.is_complete { 1.0 } else { 0.0 };
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.done as f64 / self.total as f64;
        fraction
    }

    /// "3/20" style label.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}/{}", self.position, self.total)
    }
}
