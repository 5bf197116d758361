/// Aggregated view of session progress, useful for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: u32,
    pub correct: u32,
    /// Rounded percentage of correct answers so far.
    pub accuracy: u32,
    /// Questions still waiting in the active and retest queues.
    pub remaining: usize,
    pub is_complete: bool,
}
