//! Cancel-and-reschedule timer.

use crate::clock::{Duration, Instant};

/// Holds at most one pending action. Scheduling again replaces the payload
/// and pushes the deadline back.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer, replacing anything already pending.
    pub fn schedule(&mut self, now: Instant, payload: T) {
        self.pending = Some((now + self.delay, payload));
    }

    /// Fire if the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.take(),
            _ => None,
        }
    }

    /// Fire immediately regardless of the deadline.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending action will fire.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(150));
        debouncer.schedule(start, 1);
        assert_eq!(debouncer.poll(start + Duration::from_millis(149)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(150)), Some(1));
        assert_eq!(debouncer.poll(start + Duration::from_millis(500)), None);
    }

    #[test]
    fn test_reschedule_coalesces() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(150));
        debouncer.schedule(start, "first");
        debouncer.schedule(start + Duration::from_millis(100), "second");
        assert_eq!(debouncer.poll(start + Duration::from_millis(200)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(250)), Some("second"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_take_and_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(150));
        debouncer.schedule(start, ());
        assert_eq!(debouncer.take(), Some(()));
        debouncer.schedule(start, ());
        debouncer.cancel();
        assert_eq!(debouncer.take(), None);
    }
}
