//! Linear undo/redo over combined object and pixel snapshots.

use crate::clock::{Duration, Instant};
use crate::debounce::Debouncer;
use crate::raster::RasterBuffer;
use crate::scene::Scene;

/// Default number of entries kept before the oldest is dropped.
pub const MAX_HISTORY: usize = 50;

/// Default quiet period before a scheduled snapshot is taken.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// One restorable state.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub objects: Scene,
    /// None when the surface had no area at capture time.
    pub pixels: Option<RasterBuffer>,
}

impl HistoryEntry {
    /// Deep copy of the current state.
    pub fn capture(objects: &Scene, pixels: &RasterBuffer) -> Self {
        Self {
            objects: objects.clone(),
            pixels: (!pixels.is_empty()).then(|| pixels.clone()),
        }
    }
}

/// Ordered snapshots with a cursor. Entries after the cursor form the redo
/// branch and are dropped on the next commit.
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
    max_entries: usize,
    pending: Debouncer<()>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY, DEFAULT_DEBOUNCE)
    }
}

impl History {
    pub fn new(max_entries: usize, debounce: Duration) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            max_entries: max_entries.max(1),
            pending: Debouncer::new(debounce),
        }
    }

    /// Request a snapshot. Requests inside the debounce window coalesce.
    pub fn schedule(&mut self, now: Instant) {
        self.pending.schedule(now, ());
    }

    /// Whether a scheduled snapshot should be taken now. Consumes the request.
    pub fn due(&mut self, now: Instant) -> bool {
        self.pending.poll(now).is_some()
    }

    /// Consume any pending request immediately.
    pub fn take_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// When the scheduled snapshot will be due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    pub fn cancel_pending(&mut self) {
        self.pending.cancel();
    }

    /// Append a snapshot after the cursor, discarding the redo branch.
    pub fn commit(&mut self, entry: HistoryEntry) {
        if !self.entries.is_empty() {
            let dropped = self.entries.len() - (self.index + 1);
            if dropped > 0 {
                log::debug!("Discarding {dropped} redo entries");
            }
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
        self.index = self.entries.len() - 1;
        log::debug!("History snapshot {} of {}", self.index + 1, self.entries.len());
    }

    /// Step back one entry.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward one entry.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{CanvasObject, Rectangle, StrokeStyle};
    use kurbo::Point;

    fn entry_with(count: usize) -> HistoryEntry {
        let mut scene = Scene::new();
        for i in 0..count {
            let rect: CanvasObject =
                Rectangle::new(Point::new(i as f64, 0.0), 10.0, 10.0, StrokeStyle::default()).into();
            scene.add(rect);
        }
        HistoryEntry::capture(&scene, &RasterBuffer::new(2, 2))
    }

    #[test]
    fn test_initial_state_has_no_undo() {
        let mut history = History::default();
        history.commit(entry_with(0));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = History::default();
        for i in 0..4 {
            history.commit(entry_with(i));
        }
        assert_eq!(history.undo().map(|e| e.objects.len()), Some(2));
        assert_eq!(history.undo().map(|e| e.objects.len()), Some(1));
        assert_eq!(history.redo().map(|e| e.objects.len()), Some(2));
        assert_eq!(history.redo().map(|e| e.objects.len()), Some(3));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_prunes_redo_branch() {
        let mut history = History::default();
        for i in 0..3 {
            history.commit(entry_with(i));
        }
        history.undo();
        history.undo();
        history.commit(entry_with(7));
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.current().map(|e| e.objects.len()), Some(7));
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut history = History::new(3, DEFAULT_DEBOUNCE);
        for i in 0..5 {
            history.commit(entry_with(i));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        history.undo();
        assert_eq!(history.undo().map(|e| e.objects.len()), Some(2));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_zero_area_snapshot_has_no_pixels() {
        let entry = HistoryEntry::capture(&Scene::new(), &RasterBuffer::new(0, 0));
        assert!(entry.pixels.is_none());
    }

    #[test]
    fn test_debounced_scheduling() {
        let start = Instant::now();
        let mut history = History::default();
        history.schedule(start);
        history.schedule(start + Duration::from_millis(100));
        assert!(!history.due(start + Duration::from_millis(200)));
        assert!(history.due(start + Duration::from_millis(250)));
        assert!(!history.is_pending());
    }
}
