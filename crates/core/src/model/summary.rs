use thiserror::Error;

/// Minimum percentage (inclusive) for a passing result.
pub const PASSING_PERCENTAGE: u8 = 70;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("correct answers ({correct}) exceed total answers ({total})")]
    InvalidScore { correct: usize, total: usize },
}

/// Percentage and pass/fail verdict for a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultSummary {
    correct: usize,
    total: usize,
    percentage: u8,
    passed: bool,
}

impl ResultSummary {
    /// Compute the summary for `correct` out of `total` answers.
    ///
    /// The percentage is truncated toward zero; an empty quiz scores 0 and fails.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::InvalidScore` if `correct > total`.
    pub fn summarize(correct: usize, total: usize) -> Result<Self, ScoreError> {
        if correct > total {
            return Err(ScoreError::InvalidScore { correct, total });
        }

        let percentage = if total == 0 {
            0
        } else {
            // widened so `correct * 100` cannot overflow
            let scaled = (correct as u128 * 100) / total as u128;
            u8::try_from(scaled).unwrap_or(100)
        };

        Ok(Self {
            correct,
            total,
            percentage,
            passed: percentage >= PASSING_PERCENTAGE,
        })
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }
}
