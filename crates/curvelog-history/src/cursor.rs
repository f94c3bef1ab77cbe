/// HEAD: which commit is currently materialized into the working state.
///
/// `preview_history` is set when HEAD sits behind the log tail and the user
/// is looking at history rather than editing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryCursor {
    pub head: usize,
    pub preview_history: bool,
}

impl HistoryCursor {
    /// Point HEAD at the tail of a log with `len` entries.
    pub fn reset_to_tail(&mut self, len: usize) {
        self.head = len.saturating_sub(1);
        self.preview_history = false;
    }

    pub fn is_at_tail(&self, len: usize) -> bool {
        len > 0 && self.head == len - 1
    }
}
