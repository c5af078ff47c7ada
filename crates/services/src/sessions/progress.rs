/// Snapshot of where a quiz session stands, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based position of the current question; equals `total` once complete.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }
}
