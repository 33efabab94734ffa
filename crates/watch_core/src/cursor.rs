/// Offset bookkeeping for the long-poll update queue.
///
/// The next offset is one past the highest update id consumed so far and never
/// moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateCursor {
    next: Option<i64>,
}

impl UpdateCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset to send with the next poll; `None` until something was consumed.
    pub fn offset(&self) -> Option<i64> {
        self.next
    }

    /// Marks one update as consumed.
    pub fn advance(&mut self, update_id: i64) {
        let candidate = update_id.saturating_add(1);
        self.next = Some(self.next.map_or(candidate, |next| next.max(candidate)));
    }

    /// Whether an update with this id would be handed out again by the upstream queue.
    pub fn is_pending(&self, update_id: i64) -> bool {
        self.next.map_or(true, |next| update_id >= next)
    }
}
