//! Linear undo/redo over full snapshots.

/// Linear history of snapshots with a cursor.
///
/// The snapshot under the cursor is always the one currently rendered.
/// Pushing discards any redo-future beyond the cursor.
#[derive(Debug, Clone)]
pub struct HistoryStack<T> {
    snapshots: Vec<T>,
    index: usize,
    /// Maximum number of snapshots kept (`None` = unbounded).
    limit: Option<usize>,
}

impl<T: Clone + Default> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Default> HistoryStack<T> {
    /// Create a history holding a single empty snapshot.
    pub fn new() -> Self {
        Self::with_initial(T::default())
    }

    /// Reset to a single empty snapshot with the cursor at 0.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.snapshots.push(T::default());
        self.index = 0;
    }
}

impl<T: Clone> HistoryStack<T> {
    /// Create a history seeded with an initial snapshot.
    pub fn with_initial(initial: T) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
            limit: None,
        }
    }

    /// Bound the number of retained snapshots. Oldest entries are dropped first.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.map(|l| l.max(1));
        self.enforce_limit();
        self
    }

    /// Record a new snapshot after the cursor.
    pub fn push(&mut self, snapshot: T) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(snapshot);
        self.index = self.snapshots.len() - 1;
        self.enforce_limit();
    }

    /// Step back one snapshot. No-op at the oldest snapshot.
    pub fn undo(&mut self) -> &T {
        if self.index > 0 {
            self.index -= 1;
        }
        self.current()
    }

    /// Step forward one snapshot. No-op at the newest snapshot.
    pub fn redo(&mut self) -> &T {
        if self.index + 1 < self.snapshots.len() {
            self.index += 1;
        }
        self.current()
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> &T {
        &self.snapshots[self.index]
    }

    /// Cursor position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of snapshots, including the initial one.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: a history holds at least one snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot limit, if any.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.limit else { return };
        if self.snapshots.len() > limit {
            let excess = self.snapshots.len() - limit;
            self.snapshots.drain(..excess);
            self.index = self.index.saturating_sub(excess);
        }
    }
}
